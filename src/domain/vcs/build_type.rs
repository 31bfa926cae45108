//! BuildConfiguration - a schedulable unit of work attached to VCS roots.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BuildTypeId;

/// Separator the CI server puts between project and configuration names.
const FULL_NAME_SEPARATOR: &str = " :: ";

/// A build configuration as listed by the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    id: BuildTypeId,
    name: String,
    project_name: String,
    paused: bool,
}

impl BuildConfiguration {
    /// Creates an unpaused configuration.
    pub fn new(id: BuildTypeId, project_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            project_name: project_name.into(),
            paused: false,
        }
    }

    /// Marks the configuration as paused.
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    pub fn id(&self) -> &BuildTypeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Display name including the owning project, e.g. `Backend :: Nightly`.
    pub fn full_name(&self) -> String {
        if self.project_name.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.project_name, FULL_NAME_SEPARATOR, self.name)
        }
    }
}
