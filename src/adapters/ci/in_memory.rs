//! In-memory CI server for testing and development.
//!
//! Holds VCS roots, build configurations and the root usages of each
//! configuration. Every interval write and forced check is recorded so
//! tests can assert on the exact sequence of side effects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{BuildTypeId, VcsRootId};
use crate::domain::vcs::{BuildConfiguration, CheckInterval, VcsRoot};
use crate::ports::{BuildTypeStore, CiError, VcsRootStore};

/// A recorded interval change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalChange {
    pub root_id: VcsRootId,
    pub interval: CheckInterval,
}

#[derive(Debug, Default)]
struct ServerState {
    /// Roots with their current check interval, insertion order.
    roots: Vec<(VcsRoot, CheckInterval)>,
    /// Configurations with the roots they use, insertion order.
    build_types: Vec<(BuildConfiguration, Vec<VcsRootId>)>,
    interval_changes: Vec<IntervalChange>,
    forced_checks: Vec<BuildTypeId>,
}

/// In-memory implementation of both CI server ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCiServer {
    state: Arc<RwLock<ServerState>>,
}

impl InMemoryCiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root. Replaces any root with the same id.
    pub async fn add_root(&self, root: VcsRoot, interval: CheckInterval) {
        let mut state = self.state.write().await;
        state.roots.retain(|(r, _)| r.id() != root.id());
        state.roots.push((root, interval));
    }

    /// Adds a configuration attached to the given roots.
    pub async fn add_build_type(&self, build: BuildConfiguration, roots: Vec<VcsRootId>) {
        let mut state = self.state.write().await;
        state.build_types.retain(|(b, _)| b.id() != build.id());
        state.build_types.push((build, roots));
    }

    /// Builder form of [`add_root`](Self::add_root).
    pub async fn with_root(self, root: VcsRoot, interval: CheckInterval) -> Self {
        self.add_root(root, interval).await;
        self
    }

    /// Builder form of [`add_build_type`](Self::add_build_type).
    pub async fn with_build_type(self, build: BuildConfiguration, roots: Vec<VcsRootId>) -> Self {
        self.add_build_type(build, roots).await;
        self
    }

    /// Current interval of a root, if the root exists.
    pub async fn interval_of(&self, id: &VcsRootId) -> Option<CheckInterval> {
        self.state
            .read()
            .await
            .roots
            .iter()
            .find(|(r, _)| r.id() == id)
            .map(|(_, interval)| *interval)
    }

    /// Every interval write, oldest first.
    pub async fn interval_changes(&self) -> Vec<IntervalChange> {
        self.state.read().await.interval_changes.clone()
    }

    /// Every forced check, oldest first.
    pub async fn forced_checks(&self) -> Vec<BuildTypeId> {
        self.state.read().await.forced_checks.clone()
    }
}

#[async_trait]
impl VcsRootStore for InMemoryCiServer {
    async fn find_by_external_id(&self, id: &VcsRootId) -> Result<Option<VcsRoot>, CiError> {
        Ok(self
            .state
            .read()
            .await
            .roots
            .iter()
            .find(|(r, _)| r.id() == id)
            .map(|(r, _)| r.clone()))
    }

    async fn check_interval(&self, root: &VcsRoot) -> Result<CheckInterval, CiError> {
        self.interval_of(root.id())
            .await
            .ok_or_else(|| CiError::unexpected_status(404, format!("No VCS root {}", root.id())))
    }

    async fn set_check_interval(
        &self,
        root: &VcsRoot,
        interval: CheckInterval,
    ) -> Result<(), CiError> {
        let mut state = self.state.write().await;
        let entry = state
            .roots
            .iter_mut()
            .find(|(r, _)| r.id() == root.id())
            .ok_or_else(|| CiError::unexpected_status(404, format!("No VCS root {}", root.id())))?;
        entry.1 = interval;
        state.interval_changes.push(IntervalChange {
            root_id: root.id().clone(),
            interval,
        });
        Ok(())
    }
}

#[async_trait]
impl BuildTypeStore for InMemoryCiServer {
    async fn find_using_root(&self, root: &VcsRoot) -> Result<Vec<BuildConfiguration>, CiError> {
        Ok(self
            .state
            .read()
            .await
            .build_types
            .iter()
            .filter(|(_, roots)| roots.contains(root.id()))
            .map(|(b, _)| b.clone())
            .collect())
    }

    async fn force_check(&self, build: &BuildConfiguration) -> Result<(), CiError> {
        let mut state = self.state.write().await;
        if !state.build_types.iter().any(|(b, _)| b.id() == build.id()) {
            return Err(CiError::unexpected_status(
                404,
                format!("No build configuration {}", build.id()),
            ));
        }
        state.forced_checks.push(build.id().clone());
        Ok(())
    }
}
