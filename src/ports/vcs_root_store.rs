//! VCS root port.
//!
//! Resolves roots by their external id and exposes the one mutable piece
//! of root state this service touches: the modification check interval.

use async_trait::async_trait;

use super::CiError;
use crate::domain::foundation::VcsRootId;
use crate::domain::vcs::{CheckInterval, VcsRoot};

/// Port for VCS root lookup and check interval management.
#[async_trait]
pub trait VcsRootStore: Send + Sync {
    /// Find a root by its external id.
    ///
    /// Returns `None` if no such root exists.
    async fn find_by_external_id(&self, id: &VcsRootId) -> Result<Option<VcsRoot>, CiError>;

    /// Current check interval of the root.
    async fn check_interval(&self, root: &VcsRoot) -> Result<CheckInterval, CiError>;

    /// Replace the check interval of the root.
    ///
    /// `CheckInterval::Default` restores the server-wide default.
    async fn set_check_interval(
        &self,
        root: &VcsRoot,
        interval: CheckInterval,
    ) -> Result<(), CiError>;
}
