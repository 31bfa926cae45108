//! Per-root serialization of check interval changes.
//!
//! Two requests that snapshot, lower and restore the interval of the same
//! root must not interleave, or the second snapshot captures the forced
//! value and "restores" it. Requests on different roots do not contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::VcsRootId;

/// Registry of async mutexes keyed by VCS root id.
#[derive(Debug, Clone, Default)]
pub struct RootLocks {
    locks: Arc<Mutex<HashMap<VcsRootId, Arc<AsyncMutex<()>>>>>,
}

impl RootLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the root.
    ///
    /// The guard releases the root when dropped.
    pub async fn acquire(&self, id: &VcsRootId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(id.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
