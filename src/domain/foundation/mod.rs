//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary of the
//! VCS update domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::{BuildTypeId, VcsRootId};
