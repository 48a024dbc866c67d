//! Interactive version menu.

use anyhow::Result;
use inquire::{InquireError, Select};

use crate::constants::RECENT_MARKER;
use crate::core::TgswitchError;

/// Lets the user choose one entry of a menu.
pub trait VersionPicker {
    /// Show `items` under `title` and return the chosen entry.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::PromptCancelled`] when the user cancels or the prompt
    /// cannot be shown.
    fn pick(&self, title: &str, items: Vec<String>) -> Result<String>;
}

/// Terminal menu rendered with `inquire`.
#[derive(Debug, Clone, Copy)]
pub struct InquirePicker {
    page_size: usize,
}

impl Default for InquirePicker {
    fn default() -> Self {
        Self {
            page_size: 20,
        }
    }
}

impl VersionPicker for InquirePicker {
    fn pick(&self, title: &str, items: Vec<String>) -> Result<String> {
        Select::new(title, items)
            .with_page_size(self.page_size)
            .with_help_message("↑↓ to move, type to filter, ENTER to select, ESC to cancel")
            .prompt()
            .map_err(|e| {
                let reason = match e {
                    InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                        "selection cancelled".to_string()
                    }
                    other => other.to_string(),
                };
                TgswitchError::PromptCancelled {
                    reason,
                }
                .into()
            })
    }
}

/// Build the menu: recent versions first (marked), then the catalog.
///
/// Catalog entries that are already listed as recent are not repeated.
#[must_use]
pub fn menu_items(recent: &[String], catalog: &[String]) -> Vec<String> {
    let marked = recent.iter().map(|version| format!("{version}{RECENT_MARKER}"));
    let rest = catalog.iter().filter(|version| !recent.contains(version)).cloned();
    marked.chain(rest).collect()
}

/// Strip the recent marker from a menu selection.
#[must_use]
pub fn strip_marker(selection: &str) -> &str {
    selection.strip_suffix(RECENT_MARKER).unwrap_or(selection)
}
