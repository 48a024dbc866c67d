//! Error handling for tgswitch
//!
//! Two layers, the same way the rest of the codebase is built:
//!
//! - [`TgswitchError`]: strongly typed failures raised by the resolver, the
//!   cascade, the catalog provider and the installer. Library code returns
//!   `anyhow::Result` and lifts these with `?`.
//! - [`ErrorContext`]: what the user sees. [`user_friendly_error`] downcasts an
//!   [`anyhow::Error`] back to a [`TgswitchError`] (or a well known foreign
//!   error) and attaches details and a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tgswitch::core::{TgswitchError, user_friendly_error};
//!
//! let error = anyhow::Error::from(TgswitchError::InvalidVersionArgument {
//!     version: "abc".to_string(),
//!     source_name: "command line argument".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::constants::{USAGE_HINT, VERSION_FORMAT_HELP};

/// Failure modes of a tgswitch run.
///
/// The first four variants are the resolution errors; the rest cover the
/// configuration readers and the external collaborators (GitHub, the
/// filesystem, the interactive prompt).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TgswitchError {
    /// The constraint expression could not be parsed.
    #[error("Invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint {
        /// The raw constraint expression
        constraint: String,
        /// Why parsing failed
        reason: String,
    },

    /// A catalog entry is not a parsable version.
    #[error("Invalid version '{entry}' in version catalog")]
    InvalidCatalogEntry {
        /// The offending catalog entry
        entry: String,
    },

    /// The constraint parsed, but nothing in the catalog satisfies it in the
    /// strict installable format.
    #[error("No version found to match constraint '{constraint}'")]
    NoMatchingVersion {
        /// The constraint that could not be satisfied
        constraint: String,
    },

    /// A literal version supplied by the user fails format validation.
    #[error("Invalid terragrunt version '{version}' from {source_name}")]
    InvalidVersionArgument {
        /// The rejected version string
        version: String,
        /// Where the version came from (argument, rc file, ...)
        source_name: String,
    },

    /// The requested version is well formed but not published upstream.
    #[error("Terragrunt version '{version}' does not exist")]
    VersionNotFound {
        /// The requested version
        version: String,
    },

    /// A configuration file is present but malformed.
    #[error("Unable to parse {file}: {reason}")]
    ConfigParseError {
        /// The file that failed to parse
        file: String,
        /// Parser diagnostic
        reason: String,
    },

    /// A request to the release API failed.
    #[error("Network error: {operation}")]
    NetworkError {
        /// What was being requested
        operation: String,
        /// Underlying reason, if known
        reason: Option<String>,
    },

    /// Downloading a release binary failed.
    #[error("Failed to download terragrunt {version} from {url}")]
    DownloadFailed {
        /// The version being downloaded
        version: String,
        /// The asset URL
        url: String,
    },

    /// A downloaded binary does not match the published checksum.
    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The asset name
        file: String,
        /// Published checksum
        expected: String,
        /// Computed checksum
        actual: String,
    },

    /// Replacing the bin symlink failed.
    #[error("Unable to create symlink {link} -> {target}")]
    SymlinkFailed {
        /// The bin path
        link: String,
        /// The versioned binary
        target: String,
    },

    /// The interactive prompt was cancelled or could not run.
    #[error("Prompt failed: {reason}")]
    PromptCancelled {
        /// Prompt diagnostic
        reason: String,
    },

    /// `$HOME` could not be determined.
    #[error("Unable to determine home directory")]
    HomeDirNotFound,

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// User-facing wrapper around a [`TgswitchError`].
///
/// Printed by [`display`](Self::display) as a red error line, an optional
/// yellow details line and an optional green suggestion line.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: TgswitchError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: TgswitchError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognises [`TgswitchError`] anywhere in the error chain, plus
/// [`std::io::Error`], [`toml::de::Error`] and [`reqwest::Error`]. Everything
/// else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(tg_error) = error.downcast_ref::<TgswitchError>() {
        return create_error_context(tg_error.clone());
    }

    for cause in error.chain() {
        if let Some(tg_error) = cause.downcast_ref::<TgswitchError>() {
            return create_error_context(tg_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(TgswitchError::Other {
                    message: format!("Permission denied: {error:#}"),
                })
                .with_suggestion(
                    "Use --bin to point at a directory you can write to, or run with elevated permissions",
                )
                .with_details("The default bin path /usr/local/bin usually requires root access");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(TgswitchError::Other {
                    message: format!("{error:#}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return create_error_context(TgswitchError::ConfigParseError {
            file: crate::constants::TOML_FILENAME.to_string(),
            reason: toml_error.to_string(),
        });
    }

    if let Some(http_error) = error.downcast_ref::<reqwest::Error>() {
        return create_error_context(TgswitchError::NetworkError {
            operation: "request to GitHub".to_string(),
            reason: Some(http_error.to_string()),
        });
    }

    ErrorContext::new(TgswitchError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: TgswitchError) -> ErrorContext {
    match &error {
        TgswitchError::InvalidConstraint {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use operators such as '=', '!=', '>', '>=', '<', '<=' or '~>' followed by a version, e.g. '~> 0.38.0' or '>= 0.35, < 0.40'")
            .with_details("The terragrunt_version_constraint attribute in terragrunt.hcl must be a valid version constraint"),

        TgswitchError::InvalidCatalogEntry {
            ..
        } => ErrorContext::new(error)
            .with_details("The list of available terragrunt versions contains an entry that is not a version")
            .with_suggestion("Try again later; if the problem persists report it with the offending entry"),

        TgswitchError::NoMatchingVersion {
            ..
        } => ErrorContext::new(error)
            .with_details(format!("Version does not exist or invalid terragrunt version format. {VERSION_FORMAT_HELP}"))
            .with_suggestion("Relax the constraint in terragrunt.hcl or check the published terragrunt releases"),

        TgswitchError::InvalidVersionArgument {
            ..
        } => ErrorContext::new(error)
            .with_details(VERSION_FORMAT_HELP)
            .with_suggestion(USAGE_HINT),

        TgswitchError::VersionNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run tgswitch without arguments to choose from the list of available versions"),

        TgswitchError::ConfigParseError {
            file,
            ..
        } => {
            let suggestion = format!(
                "Check the syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        TgswitchError::NetworkError {
            reason,
            ..
        } => {
            let mut ctx = ErrorContext::new(error.clone())
                .with_suggestion("Check your internet connection. Set GITHUB_AUTH_TOKEN if you are hitting the GitHub API rate limit");
            if let Some(reason) = reason {
                ctx = ctx.with_details(reason.clone());
            }
            ctx
        }

        TgswitchError::DownloadFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that a terragrunt binary is published for your platform and retry")
            .with_details("The release asset could not be downloaded"),

        TgswitchError::ChecksumMismatch {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Retry the download; the partially downloaded file has been discarded")
            .with_details("The downloaded binary does not match the SHA256SUMS published with the release"),

        TgswitchError::SymlinkFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use --bin to choose a writable location, e.g. tgswitch -b $HOME/bin/terragrunt")
            .with_details("The terragrunt symlink could not be replaced"),

        TgswitchError::PromptCancelled {
            ..
        } => ErrorContext::new(error).with_suggestion(USAGE_HINT),

        TgswitchError::HomeDirNotFound => ErrorContext::new(error)
            .with_suggestion("Check that the HOME (or USERPROFILE on Windows) environment variable is set"),

        TgswitchError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = TgswitchError::InvalidVersionArgument {
            version: "abc".to_string(),
            source_name: "command line argument".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid terragrunt version 'abc' from command line argument"
        );

        let error = TgswitchError::NoMatchingVersion {
            constraint: "~> 9.0".to_string(),
        };
        assert_eq!(error.to_string(), "No version found to match constraint '~> 9.0'");
    }

    #[test]
    fn test_user_friendly_error_downcasts_typed_errors() {
        let error = anyhow::Error::from(TgswitchError::NoMatchingVersion {
            constraint: ">= 1.0".to_string(),
        });
        let ctx = user_friendly_error(error);

        assert!(matches!(ctx.error, TgswitchError::NoMatchingVersion { .. }));
        assert!(ctx.details.unwrap().contains("0.11.9-beta1"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_finds_typed_error_under_context() {
        let result: anyhow::Result<()> = Err(TgswitchError::VersionNotFound {
            version: "0.1.2".to_string(),
        })
        .context("while switching");

        let ctx = user_friendly_error(result.unwrap_err());
        assert_eq!(
            ctx.error,
            TgswitchError::VersionNotFound {
                version: "0.1.2".to_string()
            }
        );
    }

    #[test]
    fn test_user_friendly_error_generic() {
        let ctx = user_friendly_error(anyhow::anyhow!("Something went wrong"));
        assert!(matches!(ctx.error, TgswitchError::Other { .. }));
        assert!(ctx.to_string().contains("Something went wrong"));
    }

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(TgswitchError::HomeDirNotFound)
            .with_details("details here")
            .with_suggestion("do this");

        let rendered = ctx.to_string();
        assert!(rendered.contains("Unable to determine home directory"));
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: do this"));
    }
}
