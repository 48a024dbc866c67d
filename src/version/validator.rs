//! Strict format check for installable versions.

use regex::Regex;
use std::sync::LazyLock;

static VALID_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(-[A-Za-z0-9]+)?$").expect("version pattern is valid")
});

/// Returns `true` if `version` is a concrete, installable version.
///
/// Accepts exactly three numeric components with an optional hyphenated
/// alphanumeric suffix (`0.11.7`, `0.11.9-beta1`). Constraint operators,
/// partial versions, `v` prefixes, dotted pre-release tags and build metadata
/// are all rejected. Never fails.
///
/// # Examples
///
/// ```rust
/// use tgswitch::version::is_valid_version;
///
/// assert!(is_valid_version("0.11.7"));
/// assert!(is_valid_version("0.11.9-beta1"));
/// assert!(!is_valid_version(">= 0.11.7"));
/// assert!(!is_valid_version("0.11"));
/// ```
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    VALID_VERSION.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_concrete_versions() {
        for version in ["0.11.7", "0.11.9-beta1", "1.0.0", "10.200.3000", "0.0.0-rc", "1.2.3-1"] {
            assert!(is_valid_version(version), "{version} should be valid");
        }
    }

    #[test]
    fn test_rejects_everything_else() {
        for version in [
            "",
            "abc",
            "1",
            "1.2",
            "v1.2.3",
            "1.2.3.4",
            "~> 1.2.3",
            ">=1.2.3",
            "1.2.3-",
            "1.2.3-beta.1",
            "1.2.3-beta_1",
            "1.2.3+build",
            " 1.2.3",
            "1.2.3\n",
            "١.٢.٣",
        ] {
            assert!(!is_valid_version(version), "{version:?} should be invalid");
        }
    }
}
