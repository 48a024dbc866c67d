//! Source precedence cascade
//!
//! Decides which configuration source supplies the version for this run and
//! where the `terragrunt` symlink goes. The ladder is data: [`ladder`] returns
//! the ordered [`Source`] list for the current mode and [`select`] walks it,
//! taking the first source that is present.
//!
//! # Ladder
//!
//! | # | Source | Request | Only with `.tgswitch.toml` |
//! |---|--------|---------|----------------------------|
//! | a | positional argument | [`VersionRequest::Exact`] | |
//! | b | `.tgswitchrc` | [`VersionRequest::Pinned`] | |
//! | c | `.terragrunt-version` | [`VersionRequest::Pinned`] | |
//! | d | `terragrunt.hcl` constraint | [`VersionRequest::Constraint`] | |
//! | e | `TG_VERSION` | [`VersionRequest::Pinned`] | |
//! | f | `version` in `.tgswitch.toml` | [`VersionRequest::Pinned`] | yes |
//! | g | nothing found | [`VersionRequest::Interactive`] | |
//!
//! Every literal version (a, b, c, e, f) must pass
//! [`is_valid_version`](crate::version::is_valid_version); a malformed value
//! aborts with [`TgswitchError::InvalidVersionArgument`] instead of falling
//! through. Absent sources never fail.
//!
//! # Bin Path
//!
//! Without a TOML file the command-line bin is used. With one, its `bin`
//! replaces the command-line value only while that value is still the default;
//! see [`TomlSource::bin_path`].

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::config::{ConfigSources, TomlSource};
use crate::constants::{ENV_VERSION, HCL_FILENAME, RC_FILENAME, TOML_FILENAME, VERSION_FILENAME};
use crate::core::TgswitchError;
use crate::version::is_valid_version;

/// Everything known about the user's intent before any source is read.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    /// The positional command-line version, if given.
    pub version_arg: Option<String>,
    /// The `--bin` value (the default bin when not given).
    pub cli_bin: PathBuf,
    /// The platform default bin path.
    pub default_bin: PathBuf,
    /// The discovered `.tgswitch.toml`, if any.
    pub toml: Option<TomlSource>,
}

/// What the switcher should do with the winning source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// A version named on the command line; must exist upstream.
    Exact(String),
    /// A version pinned by a file or the environment; an already installed
    /// binary is switched to without consulting the catalog.
    Pinned(String),
    /// A constraint expression to resolve against the catalog.
    Constraint(String),
    /// No source applies; ask the user.
    Interactive,
}

/// A configuration source on the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Argument,
    RcFile,
    PinFile,
    HclConstraint,
    Environment,
    TomlVersion,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => write!(f, "command line argument"),
            Self::RcFile => write!(f, "{RC_FILENAME}"),
            Self::PinFile => write!(f, "{VERSION_FILENAME}"),
            Self::HclConstraint => write!(f, "{HCL_FILENAME}"),
            Self::Environment => write!(f, "{ENV_VERSION} environment variable"),
            Self::TomlVersion => write!(f, "{TOML_FILENAME}"),
        }
    }
}

impl Source {
    /// Ask this source for a version request; `Ok(None)` means absent.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::InvalidVersionArgument`] for a malformed literal
    /// version, or the reader's error for a malformed file.
    pub fn probe(
        self,
        request: &ResolutionRequest,
        sources: &(impl ConfigSources + ?Sized),
    ) -> Result<Option<VersionRequest>> {
        let found = match self {
            Self::Argument => request.version_arg.clone().map(VersionRequest::Exact),
            Self::RcFile => sources.rc_version()?.map(VersionRequest::Pinned),
            Self::PinFile => sources.pin_version()?.map(VersionRequest::Pinned),
            Self::HclConstraint => sources.hcl_constraint()?.map(VersionRequest::Constraint),
            Self::Environment => sources.env_version().map(VersionRequest::Pinned),
            Self::TomlVersion => request
                .toml
                .as_ref()
                .and_then(TomlSource::version)
                .map(|v| VersionRequest::Pinned(v.to_string())),
        };

        if let Some(VersionRequest::Exact(version) | VersionRequest::Pinned(version)) = &found
            && !is_valid_version(version)
        {
            return Err(TgswitchError::InvalidVersionArgument {
                version: version.clone(),
                source_name: self.to_string(),
            }
            .into());
        }

        Ok(found)
    }
}

const TOML_LADDER: [Source; 6] = [
    Source::Argument,
    Source::RcFile,
    Source::PinFile,
    Source::HclConstraint,
    Source::Environment,
    Source::TomlVersion,
];

const PLAIN_LADDER: [Source; 5] = [
    Source::Argument,
    Source::RcFile,
    Source::PinFile,
    Source::HclConstraint,
    Source::Environment,
];

/// The ordered sources for a run with (`true`) or without a TOML config.
#[must_use]
pub fn ladder(has_toml: bool) -> &'static [Source] {
    if has_toml {
        &TOML_LADDER
    } else {
        &PLAIN_LADDER
    }
}

/// The outcome of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub request: VersionRequest,
    pub bin_path: PathBuf,
    /// The winning source; `None` for an interactive selection.
    pub source: Option<Source>,
}

/// Walk the ladder and return the first present source.
///
/// Sources are read lazily in ladder order: once a source wins, the ones below
/// it are never read.
///
/// # Errors
///
/// - [`TgswitchError::InvalidVersionArgument`] for a malformed literal version
/// - [`TgswitchError::ConfigParseError`] for a malformed HCL file reached on the ladder
/// - expansion failures of the TOML `bin` value
pub fn select(request: &ResolutionRequest, sources: &(impl ConfigSources + ?Sized)) -> Result<Selection> {
    let bin_path = match &request.toml {
        Some(toml) => toml.bin_path(&request.cli_bin, &request.default_bin)?,
        None => request.cli_bin.clone(),
    };

    for &source in ladder(request.toml.is_some()) {
        if let Some(version_request) = source.probe(request, sources)? {
            debug!("Selected {version_request:?} from {source}");
            return Ok(Selection {
                request: version_request,
                bin_path,
                source: Some(source),
            });
        }
    }

    debug!("No version source found; falling back to interactive selection");
    Ok(Selection {
        request: VersionRequest::Interactive,
        bin_path,
        source: None,
    })
}
