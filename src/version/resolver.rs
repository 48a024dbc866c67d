//! Resolve a constraint expression against a catalog of versions.

use tracing::debug;

use super::constraints::SemverEngine;
use super::{VersionEngine, is_valid_version};
use crate::core::TgswitchError;

/// Picks the newest installable version of a catalog that satisfies a
/// constraint.
///
/// The resolver is stateless: the catalog is supplied on every call and
/// nothing is cached, so resolving the same `(constraint, catalog)` twice
/// always yields the same answer.
///
/// # Algorithm
///
/// 1. Parse the constraint (`InvalidConstraint` on failure).
/// 2. Parse every catalog entry; a single bad entry fails the whole call with
///    `InvalidCatalogEntry`.
/// 3. Sort newest first.
/// 4. Return the first version that satisfies the constraint *and* passes
///    [`is_valid_version`]. Versions that match but are not installable (for
///    example `1.0.0-rc.1`) are skipped.
/// 5. Nothing left: `NoMatchingVersion`.
///
/// # Examples
///
/// ```rust
/// use tgswitch::version::ConstraintResolver;
///
/// let resolver = ConstraintResolver::new();
/// let catalog = ["0.11.5", "0.11.9-beta1", "0.11.10", "0.12.0"];
/// assert_eq!(resolver.resolve("~>0.11.0", &catalog)?, "0.11.10");
/// # Ok::<(), tgswitch::core::TgswitchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintResolver<E = SemverEngine> {
    engine: E,
}

impl ConstraintResolver<SemverEngine> {
    /// Creates a resolver using the default [`SemverEngine`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine: SemverEngine,
        }
    }
}

impl<E: VersionEngine> ConstraintResolver<E> {
    /// Creates a resolver backed by a custom version engine.
    pub const fn with_engine(engine: E) -> Self {
        Self {
            engine,
        }
    }

    /// Resolve `constraint` against `catalog`.
    ///
    /// # Errors
    ///
    /// - [`TgswitchError::InvalidConstraint`] if the constraint is malformed
    /// - [`TgswitchError::InvalidCatalogEntry`] if any catalog entry is not a version
    /// - [`TgswitchError::NoMatchingVersion`] if no installable version satisfies it
    pub fn resolve<S: AsRef<str>>(
        &self,
        constraint: &str,
        catalog: &[S],
    ) -> Result<String, TgswitchError> {
        let parsed = self.engine.parse_constraint(constraint)?;

        let mut versions = catalog
            .iter()
            .map(|entry| self.engine.parse_version(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        versions.sort_by(|a, b| b.cmp(a));

        for version in &versions {
            if !self.engine.satisfies(&parsed, version) {
                continue;
            }

            let candidate = version.to_string();
            debug!("Matched version: {candidate}");
            if is_valid_version(&candidate) {
                return Ok(candidate);
            }
            debug!("Skipping {candidate}: not an installable version format");
        }

        Err(TgswitchError::NoMatchingVersion {
            constraint: constraint.to_string(),
        })
    }
}

/// Resolve `constraint` against `catalog` with the default engine.
///
/// Shorthand for [`ConstraintResolver::new().resolve(..)`](ConstraintResolver::resolve).
pub fn resolve<S: AsRef<str>>(constraint: &str, catalog: &[S]) -> Result<String, TgswitchError> {
    ConstraintResolver::new().resolve(constraint, catalog)
}
