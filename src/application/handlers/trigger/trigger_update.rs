//! TriggerUpdateHandler - Forces a change check on build configurations.
//!
//! For every requested VCS root that resolves, the handler lowers the root's
//! check interval to a few seconds, forces a check on each eligible build
//! configuration, then puts the interval back exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::root_locks::RootLocks;
use crate::domain::foundation::{BuildTypeId, VcsRootId};
use crate::domain::vcs::{BuildConfiguration, CheckInterval, VcsRoot};
use crate::ports::{BuildTypeStore, CiError, VcsRootStore};

/// Command to force a change check on the configurations of some roots.
#[derive(Debug, Clone, Default)]
pub struct TriggerUpdateCommand {
    /// Requested roots, first-seen order, no duplicates.
    pub root_ids: Vec<VcsRootId>,
    /// When present, only these configurations are triggered.
    pub build_ids: Option<HashSet<BuildTypeId>>,
    /// Shared secret supplied by the caller.
    pub password: Option<String>,
}

impl TriggerUpdateCommand {
    /// Creates a command for the given roots, collapsing duplicates.
    pub fn new(root_ids: impl IntoIterator<Item = VcsRootId>) -> Self {
        let mut unique: Vec<VcsRootId> = Vec::new();
        for id in root_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            root_ids: unique,
            build_ids: None,
            password: None,
        }
    }

    /// Restricts triggering to the given configurations.
    ///
    /// An empty filter is still a filter: nothing will match it.
    pub fn with_build_filter(mut self, build_ids: impl IntoIterator<Item = BuildTypeId>) -> Self {
        self.build_ids = Some(build_ids.into_iter().collect());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    fn accepts(&self, build: &BuildConfiguration) -> bool {
        if build.is_paused() {
            return false;
        }
        match &self.build_ids {
            Some(filter) => filter.contains(build.id()),
            None => true,
        }
    }
}

/// Result of a processed trigger request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerUpdateResult {
    /// Full names of the triggered configurations, in trigger order.
    pub triggered_builds: Vec<String>,
}

/// Why a trigger request did not produce a result.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Invalid or missing password")]
    Unauthorized,

    #[error("No requested VCS root could be resolved")]
    NoMatchingRoots,

    #[error("CI server error: {0}")]
    Ci(#[from] CiError),

    #[error("Trigger task failed: {0}")]
    TaskFailed(String),
}

impl TriggerError {
    /// True for failures the caller cannot fix by changing the request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TriggerError::Ci(_) | TriggerError::TaskFailed(_))
    }
}

/// Immutable settings for the trigger handler.
#[derive(Debug, Clone, Default)]
pub struct TriggerSettings {
    /// Shared secret callers must present. Empty or absent disables the check.
    pub password: Option<SecretString>,
}

impl TriggerSettings {
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(SecretString::new(password.into())),
        }
    }

    fn required_password(&self) -> Option<&str> {
        self.password
            .as_ref()
            .map(|secret| secret.expose_secret().as_str())
            .filter(|password| !password.is_empty())
    }
}

/// Handler for trigger requests.
pub struct TriggerUpdateHandler {
    ci: CiPorts,
    settings: TriggerSettings,
}

impl TriggerUpdateHandler {
    pub fn new(
        roots: Arc<dyn VcsRootStore>,
        build_types: Arc<dyn BuildTypeStore>,
        settings: TriggerSettings,
    ) -> Self {
        Self {
            ci: CiPorts {
                roots,
                build_types,
                locks: RootLocks::new(),
            },
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: TriggerUpdateCommand,
    ) -> Result<TriggerUpdateResult, TriggerError> {
        match self.process(Arc::new(cmd)).await {
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Error while triggering VCS update");
                Err(e)
            }
            other => other,
        }
    }

    async fn process(
        &self,
        cmd: Arc<TriggerUpdateCommand>,
    ) -> Result<TriggerUpdateResult, TriggerError> {
        // 1. Authorize before touching the CI server
        self.authorize(cmd.password.as_deref())?;

        // 2. Resolve roots, dropping unknown ids
        let roots = self.resolve_roots(&cmd.root_ids).await?;
        if roots.is_empty() {
            warn!(requested = cmd.root_ids.len(), "No VCS roots matched the request");
            return Err(TriggerError::NoMatchingRoots);
        }

        // 3. Trigger each root in turn. Each root runs in its own task so the
        //    interval is restored even when the caller stops waiting.
        let mut result = TriggerUpdateResult::default();
        for root in roots {
            let ci = self.ci.clone();
            let cmd = Arc::clone(&cmd);
            let task = tokio::spawn(async move { ci.trigger_root(&root, &cmd).await });

            let triggered = task
                .await
                .map_err(|e| TriggerError::TaskFailed(e.to_string()))??;
            result.triggered_builds.extend(triggered);
        }

        Ok(result)
    }

    fn authorize(&self, supplied: Option<&str>) -> Result<(), TriggerError> {
        let Some(expected) = self.settings.required_password() else {
            return Ok(());
        };

        let matches = supplied
            .map(|supplied| bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())))
            .unwrap_or(false);

        if !matches {
            warn!(supplied = supplied.is_some(), "Invalid password sent");
            return Err(TriggerError::Unauthorized);
        }
        Ok(())
    }

    async fn resolve_roots(&self, ids: &[VcsRootId]) -> Result<Vec<VcsRoot>, CiError> {
        let mut roots: Vec<VcsRoot> = Vec::with_capacity(ids.len());
        for id in ids {
            match self.ci.roots.find_by_external_id(id).await? {
                Some(root) => {
                    if !roots.iter().any(|r| r.id() == root.id()) {
                        roots.push(root);
                    }
                }
                None => debug!(root = %id, "Skipping unknown VCS root"),
            }
        }
        Ok(roots)
    }
}

/// Ports and locks shared with the per-root trigger tasks.
#[derive(Clone)]
struct CiPorts {
    roots: Arc<dyn VcsRootStore>,
    build_types: Arc<dyn BuildTypeStore>,
    locks: RootLocks,
}

impl CiPorts {
    /// Lowers the interval, forces matching builds and restores the interval.
    ///
    /// Returns the full names of the triggered configurations.
    async fn trigger_root(
        &self,
        root: &VcsRoot,
        cmd: &TriggerUpdateCommand,
    ) -> Result<Vec<String>, CiError> {
        let builds = self.build_types.find_using_root(root).await?;
        if builds.is_empty() {
            debug!(root = %root.id(), "VCS root has no build configurations");
            return Ok(Vec::new());
        }

        let _guard = self.locks.acquire(root.id()).await;

        let previous = self.roots.check_interval(root).await?;

        // A failed write may still have been applied, so restore from here on.
        let mut triggered = Vec::new();
        let forced = match self
            .roots
            .set_check_interval(root, CheckInterval::forced())
            .await
        {
            Ok(()) => self.force_matching(&builds, cmd, &mut triggered).await,
            Err(e) => Err(e),
        };
        let restored = self.roots.set_check_interval(root, previous).await;

        match (forced, restored) {
            (Ok(count), Ok(())) => {
                if count == 0 {
                    warn!(root = %root.id(), "Couldn't find a matching build for {}", root.name());
                }
                Ok(triggered)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Err(restore_err)) => {
                error!(
                    root = %root.id(),
                    interval = %previous,
                    error = %restore_err,
                    "Failed to restore check interval"
                );
                Err(e)
            }
        }
    }

    async fn force_matching(
        &self,
        builds: &[BuildConfiguration],
        cmd: &TriggerUpdateCommand,
        triggered: &mut Vec<String>,
    ) -> Result<usize, CiError> {
        let mut count = 0;
        for build in builds.iter().filter(|b| cmd.accepts(b)) {
            self.build_types.force_check(build).await?;
            let full_name = build.full_name();
            info!(build = %build.id(), "Forcing check for {}", full_name);
            triggered.push(full_name);
            count += 1;
        }
        Ok(count)
    }
}
