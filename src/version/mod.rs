//! Version validation, constraint parsing and resolution.
//!
//! # Module Organization
//!
//! - [`validator`] - strict format check for installable versions
//! - [`constraints`] - constraint expressions and the default [`SemverEngine`]
//! - [`resolver`] - newest-match resolution against a catalog
//! - [`local`] - the local-preference override
//!
//! The resolver only talks to the version library through [`VersionEngine`],
//! so the semantic-versioning backend can be replaced without touching the
//! cascade or the resolution algorithm.

pub mod constraints;
pub mod local;
pub mod resolver;
pub mod validator;

pub use constraints::{Constraint, SemverEngine};
pub use local::{LocalPreference, prefer_local};
pub use resolver::{ConstraintResolver, resolve};
pub use validator::is_valid_version;

use crate::core::TgswitchError;

/// The operations the resolver needs from a versioning library.
///
/// Ordering of versions comes from [`Ord`] on [`Self::Version`]; newest
/// versions compare greatest.
pub trait VersionEngine {
    /// A parsed concrete version.
    type Version: Ord + std::fmt::Display;
    /// A parsed constraint predicate.
    type Constraint;

    /// Parse a constraint expression.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::InvalidConstraint`] if the expression is malformed.
    fn parse_constraint(&self, expression: &str) -> Result<Self::Constraint, TgswitchError>;

    /// Parse a catalog entry.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::InvalidCatalogEntry`] if `raw` is not a version.
    fn parse_version(&self, raw: &str) -> Result<Self::Version, TgswitchError>;

    /// Whether `version` satisfies `constraint`.
    fn satisfies(&self, constraint: &Self::Constraint, version: &Self::Version) -> bool;
}
