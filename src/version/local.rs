//! Prefer an already-installed version over a fresh upstream match.

use tracing::debug;

use super::resolve;

/// Resolve `constraint` against the locally installed versions only.
///
/// Returns `None` when nothing installed satisfies the constraint, or when the
/// constraint or the installed list cannot be parsed. Never an error: the
/// caller falls back to the upstream answer.
#[must_use]
pub fn prefer_local<S: AsRef<str>>(constraint: &str, installed: &[S]) -> Option<String> {
    match resolve(constraint, installed) {
        Ok(version) => Some(version),
        Err(err) => {
            debug!("No local binary satisfies '{constraint}': {err}");
            None
        }
    }
}

/// Policy switch for the local-preference override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalPreference {
    enabled: bool,
}

impl LocalPreference {
    /// Creates the policy; `enabled` mirrors the `TGS_PREFER_LOCAL` setting.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
        }
    }

    /// Whether the override is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pick the final version for `constraint`.
    ///
    /// When enabled and an installed version satisfies the constraint, that
    /// version replaces `upstream`; otherwise `upstream` is returned unchanged.
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, constraint: &str, upstream: String, installed: &[S]) -> String {
        if !self.enabled {
            return upstream;
        }

        match prefer_local(constraint, installed) {
            Some(local) => {
                debug!("Preferring local binary {local} over upstream {upstream}");
                local
            }
            None => upstream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_local_match() {
        let installed = ["1.5.0", "0.9.0"];
        let policy = LocalPreference::new(true);
        assert_eq!(policy.select(">=1.0.0", "2.0.0".to_string(), &installed), "1.5.0");
    }

    #[test]
    fn test_disabled_policy_keeps_upstream() {
        let installed = ["1.5.0"];
        let policy = LocalPreference::default();
        assert!(!policy.is_enabled());
        assert_eq!(policy.select(">=1.0.0", "2.0.0".to_string(), &installed), "2.0.0");
    }

    #[test]
    fn test_falls_back_when_nothing_local_matches() {
        let installed = ["0.9.0"];
        let policy = LocalPreference::new(true);
        assert_eq!(policy.select(">=1.0.0", "2.0.0".to_string(), &installed), "2.0.0");
    }

    #[test]
    fn test_failures_are_swallowed() {
        assert_eq!(prefer_local(">=1.0.0", &["garbage"]), None);
        assert_eq!(prefer_local("not a constraint", &["1.0.0"]), None);
        let empty: [&str; 0] = [];
        assert_eq!(prefer_local(">=1.0.0", &empty), None);
    }
}
