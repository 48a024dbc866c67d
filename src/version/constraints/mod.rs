//! Version constraint parsing and matching.
//!
//! Terragrunt projects express the required tool version with the operator
//! syntax used across the HashiCorp ecosystem:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `1.2.3`, `= 1.2.3` | Exactly this version |
//! | `!= 1.2.3` | Anything but this version |
//! | `> 1.2.3`, `>= 1.2.3`, `=> 1.2.3` | Newer than (or equal to) |
//! | `< 1.2.3`, `<= 1.2.3`, `=< 1.2.3` | Older than (or equal to) |
//! | `~> 1.2.3` | `>= 1.2.3, < 1.3.0` (only the last given segment may grow) |
//! | `~> 1.2` | `>= 1.2.0, < 2.0.0` |
//! | `>= 1.0, < 2.0` | Comma separated terms, all must hold |
//!
//! Operand versions may omit trailing segments (`1.2` means `1.2.0`) and may
//! carry a leading `v`.
//!
//! # Pre-releases
//!
//! A term without a pre-release never matches a pre-release version. A term
//! with a pre-release only matches pre-releases of the same `major.minor.patch`
//! (stable versions still match non-pessimistic terms).
//!
//! # Examples
//!
//! ```rust
//! use tgswitch::version::constraints::{Constraint, parse_version};
//!
//! let constraint = Constraint::parse("~> 0.11.0")?;
//! assert!(constraint.matches(&parse_version("0.11.10")?));
//! assert!(!constraint.matches(&parse_version("0.12.0")?));
//! assert!(!constraint.matches(&parse_version("0.11.9-beta1")?));
//! # Ok::<(), tgswitch::core::TgswitchError>(())
//! ```

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use super::VersionEngine;
use crate::core::TgswitchError;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?([0-9]+(?:\.[0-9]+)*)(?:-([0-9A-Za-z\-]+(?:\.[0-9A-Za-z\-]+)*)|([A-Za-z][0-9A-Za-z\-]*(?:\.[0-9A-Za-z\-]+)*))?(?:\+([0-9A-Za-z\-]+(?:\.[0-9A-Za-z\-]+)*))?$",
    )
    .expect("version pattern is valid")
});

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(~>|>=|=>|<=|=<|!=|=|>|<)?\s*(\S+)$").expect("constraint term pattern is valid")
});

/// Comparison operator of a single constraint term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` (also implied when no operator is given)
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=` (also written `=>`)
    GreaterEq,
    /// `<`
    Less,
    /// `<=` (also written `=<`)
    LessEq,
    /// `~>`
    Pessimistic,
}

impl Operator {
    fn from_symbol(symbol: Option<&str>) -> Self {
        match symbol {
            Some("!=") => Self::NotEqual,
            Some(">") => Self::Greater,
            Some(">=" | "=>") => Self::GreaterEq,
            Some("<") => Self::Less,
            Some("<=" | "=<") => Self::LessEq,
            Some("~>") => Self::Pessimistic,
            _ => Self::Equal,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Pessimistic => "~>",
        }
    }
}

/// One `operator version` term of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    op: Operator,
    version: Version,
    /// Number of numeric segments written in the operand (1 to 3).
    specified: usize,
}

impl Term {
    /// The comparison operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.op
    }

    /// The operand, padded to three segments.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    fn matches(&self, version: &Version) -> bool {
        let c = &self.version;
        match self.op {
            Operator::Equal => precedence(version, c) == Ordering::Equal,
            Operator::NotEqual => precedence(version, c) != Ordering::Equal,
            Operator::Greater => prerelease_check(version, c) && precedence(version, c).is_gt(),
            Operator::GreaterEq => prerelease_check(version, c) && precedence(version, c).is_ge(),
            Operator::Less => prerelease_check(version, c) && precedence(version, c).is_lt(),
            Operator::LessEq => prerelease_check(version, c) && precedence(version, c).is_le(),
            Operator::Pessimistic => self.matches_pessimistic(version),
        }
    }

    fn matches_pessimistic(&self, version: &Version) -> bool {
        let c = &self.version;
        if !prerelease_check(version, c) || (!c.pre.is_empty() && version.pre.is_empty()) {
            return false;
        }
        if precedence(version, c).is_lt() {
            return false;
        }

        let v_segments = segments(version);
        let c_segments = segments(c);
        let last = self.specified - 1;

        // Every segment before the last written one is pinned.
        if v_segments[..last] != c_segments[..last] {
            return false;
        }
        c_segments[last] <= v_segments[last]
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.version)
    }
}

/// A parsed constraint expression: every term must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    terms: Vec<Term>,
}

impl Constraint {
    /// Parse a constraint expression such as `">= 0.35, < 0.40"`.
    ///
    /// # Errors
    ///
    /// Returns [`TgswitchError::InvalidConstraint`] when the expression is
    /// empty, has an empty term, uses an unknown operator or an operand that is
    /// not a version.
    pub fn parse(expression: &str) -> Result<Self, TgswitchError> {
        let invalid = |reason: String| TgswitchError::InvalidConstraint {
            constraint: expression.to_string(),
            reason,
        };

        if expression.trim().is_empty() {
            return Err(invalid("constraint is empty".to_string()));
        }

        let mut terms = Vec::new();
        for raw in expression.split(',') {
            let raw = raw.trim();
            let captures = TERM_PATTERN
                .captures(raw)
                .ok_or_else(|| invalid(format!("malformed constraint term '{raw}'")))?;

            let op = Operator::from_symbol(captures.get(1).map(|m| m.as_str()));
            let operand = &captures[2];
            let (version, specified) = parse_operand(operand)
                .filter(|&(_, specified)| specified <= 3)
                .ok_or_else(|| invalid(format!("'{operand}' is not a valid version")))?;

            terms.push(Term {
                op,
                version,
                specified,
            });
        }

        Ok(Self {
            terms,
        })
    }

    /// The individual terms, in the order written.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Check whether `version` satisfies every term.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.terms.iter().all(|term| term.matches(version))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

/// Parse a catalog entry into a [`Version`].
///
/// A leading `v` is accepted and missing minor/patch segments default to zero,
/// so `v1.2` parses as `1.2.0`. Surrounding whitespace is not accepted.
///
/// Release tags are looser than semver: a pre-release may follow the patch
/// number without a hyphen (`1.2.3beta1` is `1.2.3-beta1`), and segments beyond
/// the third are kept as leading build metadata (`1.2.3.4` is `1.2.3+4`), so
/// such a tag orders just above its three-segment release and is never
/// reported as installable.
///
/// # Errors
///
/// Returns [`TgswitchError::InvalidCatalogEntry`] when `raw` is not a version.
pub fn parse_version(raw: &str) -> Result<Version, TgswitchError> {
    parse_operand(raw).map(|(version, _)| version).ok_or_else(|| {
        TgswitchError::InvalidCatalogEntry {
            entry: raw.to_string(),
        }
    })
}

/// Parse a version, returning it with the number of numeric segments written.
fn parse_operand(raw: &str) -> Option<(Version, usize)> {
    let captures = VERSION_PATTERN.captures(raw)?;

    let written = captures
        .get(1)?
        .as_str()
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    let mut numbers = [0_u64; 3];
    for (slot, segment) in numbers.iter_mut().zip(&written) {
        *slot = *segment;
    }

    let pre = match captures.get(2).or_else(|| captures.get(3)) {
        Some(pre) => Prerelease::new(pre.as_str()).ok()?,
        None => Prerelease::EMPTY,
    };

    let mut build: Vec<String> = written.iter().skip(3).map(ToString::to_string).collect();
    if let Some(metadata) = captures.get(4) {
        build.push(metadata.as_str().to_string());
    }
    let build = if build.is_empty() {
        BuildMetadata::EMPTY
    } else {
        BuildMetadata::new(&build.join(".")).ok()?
    };

    let version = Version {
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        pre,
        build,
    };
    Some((version, written.len()))
}

/// Ordering that ignores build metadata.
fn precedence(a: &Version, b: &Version) -> Ordering {
    segments(a).cmp(&segments(b)).then_with(|| a.pre.cmp(&b.pre))
}

const fn segments(version: &Version) -> [u64; 3] {
    [version.major, version.minor, version.patch]
}

fn prerelease_check(version: &Version, constraint: &Version) -> bool {
    match (version.pre.is_empty(), constraint.pre.is_empty()) {
        (false, false) => segments(version) == segments(constraint),
        (false, true) => false,
        _ => true,
    }
}

/// [`VersionEngine`] backed by the `semver` crate with the operator syntax
/// described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverEngine;

impl VersionEngine for SemverEngine {
    type Version = Version;
    type Constraint = Constraint;

    fn parse_constraint(&self, expression: &str) -> Result<Constraint, TgswitchError> {
        Constraint::parse(expression)
    }

    fn parse_version(&self, raw: &str) -> Result<Version, TgswitchError> {
        parse_version(raw)
    }

    fn satisfies(&self, constraint: &Constraint, version: &Version) -> bool {
        constraint.matches(version)
    }
}
