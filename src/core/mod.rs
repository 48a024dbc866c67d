//! Core types for tgswitch
//!
//! Holds the error model shared by every other module: the typed
//! [`TgswitchError`], the user-facing [`ErrorContext`] and the
//! [`user_friendly_error`] conversion used by `main`.

pub mod error;

pub use error::{ErrorContext, TgswitchError, user_friendly_error};
