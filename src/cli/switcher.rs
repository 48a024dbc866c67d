//! Carry out a cascade [`Selection`]: resolve, install and switch.

use anyhow::Result;
use colored::Colorize;
use tracing::{debug, warn};

use super::prompt::{VersionPicker, menu_items, strip_marker};
use crate::cascade::{Selection, Source, VersionRequest};
use crate::catalog::{CatalogProvider, version_exists};
use crate::config::Settings;
use crate::core::TgswitchError;
use crate::installer::Installer;
use crate::version::{ConstraintResolver, LocalPreference};

/// Title of the interactive menu.
pub const MENU_TITLE: &str = "Select Terragrunt version";

/// Drives a [`Selection`] through the catalog, the resolver and the installer.
///
/// The catalog is only fetched when the request needs it: a pinned version
/// that is already downloaded is switched to without any network access.
pub struct Switcher<'a, C, I, P> {
    settings: &'a Settings,
    catalog: C,
    installer: I,
    picker: P,
    resolver: ConstraintResolver,
    quiet: bool,
}

impl<'a, C, I, P> Switcher<'a, C, I, P>
where
    C: CatalogProvider,
    I: Installer,
    P: VersionPicker,
{
    /// Creates a switcher from its collaborators.
    pub fn new(settings: &'a Settings, catalog: C, installer: I, picker: P) -> Self {
        Self {
            settings,
            catalog,
            installer,
            picker,
            resolver: ConstraintResolver::new(),
            quiet: false,
        }
    }

    /// Suppress progress lines on stdout.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The installer, for inspection after a run.
    pub const fn installer(&self) -> &I {
        &self.installer
    }

    fn say(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Resolve the selection to a concrete version, install it and switch the
    /// bin path to it. Returns the version now in use.
    ///
    /// # Errors
    ///
    /// - [`TgswitchError::VersionNotFound`] if a requested version is not published
    /// - resolver errors for constraint selections
    /// - [`TgswitchError::PromptCancelled`] if the interactive menu is cancelled
    /// - catalog and installer failures
    pub async fn run(&self, selection: &Selection) -> Result<String> {
        if let Some(source) = selection.source
            && source != Source::Argument
        {
            self.say(format!("Reading required terragrunt version from {}", source.to_string().cyan()));
        }

        let version = match &selection.request {
            VersionRequest::Exact(version) => {
                self.require_published(version).await?;
                version.clone()
            }
            VersionRequest::Pinned(version) => {
                if self.installer.is_installed(version) {
                    debug!("terragrunt {version} is already installed; skipping catalog lookup");
                } else {
                    self.require_published(version).await?;
                }
                version.clone()
            }
            VersionRequest::Constraint(constraint) => self.resolve_constraint(constraint).await?,
            VersionRequest::Interactive => self.choose_interactively().await?,
        };

        self.installer.install(&version, &selection.bin_path).await?;
        self.say(format!(
            "{} \"{}\"",
            "Switched terragrunt to version".green(),
            version.bold()
        ));
        Ok(version)
    }

    async fn require_published(&self, version: &str) -> Result<()> {
        let catalog = self.catalog.versions().await?;
        if version_exists(version, &catalog) {
            Ok(())
        } else {
            Err(TgswitchError::VersionNotFound {
                version: version.to_string(),
            }
            .into())
        }
    }

    async fn resolve_constraint(&self, constraint: &str) -> Result<String> {
        let catalog = self.catalog.versions().await?;
        let upstream = self.resolver.resolve(constraint, &catalog)?;
        self.say(format!("Matched version: {upstream}"));

        let preference = LocalPreference::new(self.settings.prefer_local);
        if !preference.is_enabled() {
            return Ok(upstream);
        }

        let installed = self.installer.installed_versions().unwrap_or_else(|e| {
            warn!("Unable to list installed versions: {e:#}");
            Vec::new()
        });
        let version = preference.select(constraint, upstream, &installed);
        Ok(version)
    }

    async fn choose_interactively(&self) -> Result<String> {
        let catalog = self.catalog.versions().await?;
        let recent = self.installer.recent_versions().unwrap_or_else(|e| {
            warn!("Unable to read recent versions: {e:#}");
            Vec::new()
        });

        let selected = self.picker.pick(MENU_TITLE, menu_items(&recent, &catalog))?;
        Ok(strip_marker(&selected).to_string())
    }
}
