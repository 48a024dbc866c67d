//! Cross-platform utilities
//!
//! - [`fs`] - atomic writes, executable bits and the bin symlink swap
//! - [`platform`] - target-dependent names and path expansion
//! - [`progress`] - the download progress indicator

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, replace_symlink, set_executable};
pub use platform::{get_home_dir, is_windows, resolve_path};
pub use progress::DownloadProgress;
