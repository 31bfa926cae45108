//! Strongly-typed external identifiers.
//!
//! Both identifiers are external ids assigned by the CI server: latin
//! letters, digits and underscores only. Anything else could never resolve,
//! and would change the meaning of a REST locator built from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

fn validate_external_id(field: &str, id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if let Some(c) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(ValidationError::invalid_format(
            field,
            format!("unexpected character {:?}", c),
        ));
    }
    Ok(())
}

/// External identifier of a VCS root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VcsRootId(String);

impl VcsRootId {
    /// Creates a new VcsRootId, returning error if blank or malformed.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_external_id("vcs_root_id", &id)?;
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VcsRootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External identifier of a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTypeId(String);

impl BuildTypeId {
    /// Creates a new BuildTypeId, returning error if blank or malformed.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_external_id("build_type_id", &id)?;
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
