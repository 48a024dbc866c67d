//! Download progress indicator
//!
//! A thin wrapper over `indicatif` so the installer does not care whether a
//! progress bar is actually drawn. The bar is hidden when the user asked for
//! quiet output or when `TGSWITCH_NO_PROGRESS` is set.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Environment variable disabling progress output.
pub const NO_PROGRESS_ENV: &str = "TGSWITCH_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// Progress of a single binary download.
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    inner: IndicatifBar,
}

impl DownloadProgress {
    /// Creates a byte-count bar when `total_bytes` is known, a spinner otherwise.
    #[must_use]
    pub fn new(total_bytes: Option<u64>, quiet: bool, message: impl Into<String>) -> Self {
        let bar = if quiet || is_progress_disabled() {
            IndicatifBar::hidden()
        } else if let Some(total) = total_bytes {
            let bar = IndicatifBar::new(total);
            bar.set_style(download_style());
            bar
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());

        Self {
            inner: bar,
        }
    }

    /// Record `bytes` more bytes received.
    pub fn inc(&self, bytes: u64) {
        self.inner.inc(bytes);
    }

    /// Bytes recorded so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.inner.finish_and_clear();
    }
}

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg} {bytes}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
