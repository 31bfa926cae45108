//! VcsRoot - a reference to a repository the CI server polls.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::VcsRootId;

/// A VCS root as resolved from the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsRoot {
    id: VcsRootId,
    name: String,
}

impl VcsRoot {
    pub fn new(id: VcsRootId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> &VcsRootId {
        &self.id
    }

    /// Human readable name, used in log lines only.
    pub fn name(&self) -> &str {
        &self.name
    }
}
