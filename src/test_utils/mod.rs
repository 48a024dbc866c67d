//! Test utilities for tgswitch
//!
//! In-memory stand-ins for every external collaborator, so the cascade and
//! the switcher can be tested without a network, a terminal or a writable
//! `/usr/local/bin`:
//!
//! - [`StaticSources`] - configuration sources with fixed values
//! - [`StaticCatalog`] - a fixed catalog that counts fetches
//! - [`RecordingInstaller`] - records installs instead of downloading
//! - [`ScriptedPicker`] - answers the interactive menu with a fixed choice
//!
//! # Example
//!
//! ```rust,no_run
//! use tgswitch::test_utils::{StaticCatalog, init_test_logging};
//!
//! init_test_logging(None);
//! let catalog = StaticCatalog::new(["0.38.4", "0.38.3"]);
//! assert_eq!(catalog.fetches(), 0);
//! ```

use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogProvider;
use crate::cli::prompt::VersionPicker;
use crate::config::ConfigSources;
use crate::core::TgswitchError;
use crate::installer::Installer;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// [`ConfigSources`] with fixed values that records which sources were read.
#[derive(Debug, Default)]
pub struct StaticSources {
    pub rc: Option<String>,
    pub pin: Option<String>,
    pub hcl: Option<String>,
    pub env: Option<String>,
    /// When set, reading the HCL source fails with a parse error.
    pub hcl_error: bool,
    reads: RefCell<Vec<&'static str>>,
}

impl StaticSources {
    /// Sources with nothing present.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the `.tgswitchrc` content.
    #[must_use]
    pub fn with_rc(mut self, version: impl Into<String>) -> Self {
        self.rc = Some(version.into());
        self
    }

    /// Set the `.terragrunt-version` content.
    #[must_use]
    pub fn with_pin(mut self, version: impl Into<String>) -> Self {
        self.pin = Some(version.into());
        self
    }

    /// Set the `terragrunt.hcl` constraint.
    #[must_use]
    pub fn with_hcl(mut self, constraint: impl Into<String>) -> Self {
        self.hcl = Some(constraint.into());
        self
    }

    /// Set `TG_VERSION`.
    #[must_use]
    pub fn with_env(mut self, version: impl Into<String>) -> Self {
        self.env = Some(version.into());
        self
    }

    /// Make reading `terragrunt.hcl` fail with a parse error.
    #[must_use]
    pub fn with_hcl_error(mut self) -> Self {
        self.hcl_error = true;
        self
    }

    /// Names of the sources read so far, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<&'static str> {
        self.reads.borrow().clone()
    }
}

impl ConfigSources for StaticSources {
    fn rc_version(&self) -> Result<Option<String>> {
        self.reads.borrow_mut().push("rc");
        Ok(self.rc.clone())
    }

    fn pin_version(&self) -> Result<Option<String>> {
        self.reads.borrow_mut().push("pin");
        Ok(self.pin.clone())
    }

    fn hcl_constraint(&self) -> Result<Option<String>> {
        self.reads.borrow_mut().push("hcl");
        if self.hcl_error {
            return Err(TgswitchError::ConfigParseError {
                file: "terragrunt.hcl".to_string(),
                reason: "unexpected token".to_string(),
            }
            .into());
        }
        Ok(self.hcl.clone())
    }

    fn env_version(&self) -> Option<String> {
        self.reads.borrow_mut().push("env");
        self.env.clone()
    }
}

/// A fixed catalog. Clones share the fetch counter.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    versions: Vec<String>,
    fetches: Arc<AtomicUsize>,
}

impl StaticCatalog {
    /// A catalog listing `versions`.
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            versions: versions.into_iter().map(Into::into).collect(),
            fetches: Arc::default(),
        }
    }

    /// How many times the catalog was fetched.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CatalogProvider for StaticCatalog {
    async fn versions(&self) -> Result<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.versions.clone())
    }
}

/// An installer that records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    installed: Mutex<Vec<String>>,
    recent: Vec<String>,
    installs: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingInstaller {
    /// An installer with `versions` already downloaded.
    pub fn with_installed<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: Mutex::new(versions.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Set the recent versions reported to the interactive menu.
    #[must_use]
    pub fn with_recent<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recent = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Every `(version, bin_path)` passed to [`Installer::install`].
    #[must_use]
    pub fn installs(&self) -> Vec<(String, PathBuf)> {
        self.installs.lock().map(|installs| installs.clone()).unwrap_or_default()
    }
}

impl Installer for RecordingInstaller {
    fn is_installed(&self, version: &str) -> bool {
        self.installed.lock().is_ok_and(|installed| installed.iter().any(|v| v == version))
    }

    fn installed_versions(&self) -> Result<Vec<String>> {
        Ok(self.installed.lock().map(|installed| installed.clone()).unwrap_or_default())
    }

    fn recent_versions(&self) -> Result<Vec<String>> {
        Ok(self.recent.clone())
    }

    async fn install(&self, version: &str, bin_path: &Path) -> Result<PathBuf> {
        if let Ok(mut installs) = self.installs.lock() {
            installs.push((version.to_string(), bin_path.to_path_buf()));
        }
        if let Ok(mut installed) = self.installed.lock()
            && !installed.iter().any(|v| v == version)
        {
            installed.push(version.to_string());
        }
        Ok(PathBuf::from(format!("terragrunt_{version}")))
    }
}

/// Answers the interactive menu with a fixed choice, or cancels it.
///
/// Clones share the record of the last menu shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    choice: Option<String>,
    last_menu: Arc<Mutex<Option<(String, Vec<String>)>>>,
}

impl ScriptedPicker {
    /// A picker that selects `choice`.
    #[must_use]
    pub fn choose(choice: impl Into<String>) -> Self {
        Self {
            choice: Some(choice.into()),
            last_menu: Arc::default(),
        }
    }

    /// A picker that cancels the menu.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// The title and items of the last menu shown.
    #[must_use]
    pub fn last_menu(&self) -> Option<(String, Vec<String>)> {
        self.last_menu.lock().ok().and_then(|menu| menu.clone())
    }
}

impl VersionPicker for ScriptedPicker {
    fn pick(&self, title: &str, items: Vec<String>) -> Result<String> {
        if let Ok(mut menu) = self.last_menu.lock() {
            *menu = Some((title.to_string(), items));
        }
        self.choice.clone().ok_or_else(|| {
            TgswitchError::PromptCancelled {
                reason: "selection cancelled".to_string(),
            }
            .into()
        })
    }
}
