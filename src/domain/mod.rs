//! Domain layer containing the value types shared by every other layer.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, validation errors)
//! - `vcs` - VCS roots, build configurations and polling intervals as seen
//!   from outside the CI server

pub mod foundation;
pub mod vcs;
