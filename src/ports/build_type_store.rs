//! Build configuration port.

use async_trait::async_trait;

use super::CiError;
use crate::domain::vcs::{BuildConfiguration, VcsRoot};

/// Port for listing build configurations and requesting change checks.
#[async_trait]
pub trait BuildTypeStore: Send + Sync {
    /// All build configurations attached to the root, in server order.
    ///
    /// Paused configurations are included.
    async fn find_using_root(&self, root: &VcsRoot) -> Result<Vec<BuildConfiguration>, CiError>;

    /// Ask the server to check the configuration's roots for changes now.
    ///
    /// Fire and forget: the server owns scheduling and execution.
    async fn force_check(&self, build: &BuildConfiguration) -> Result<(), CiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_type_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn BuildTypeStore) {}
    }
}
