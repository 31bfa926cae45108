//! Modification check interval of a VCS root.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval applied to a root while its build configurations are forced
/// to check for changes.
pub const FORCED_CHECK_INTERVAL_SECS: u32 = 5;

/// How often the CI server polls a VCS root for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "seconds", rename_all = "snake_case")]
pub enum CheckInterval {
    /// Inherit the server-wide default.
    Default,
    /// Explicit per-root override in seconds.
    Explicit(u32),
}

impl CheckInterval {
    /// The short interval used to make a pending check run almost at once.
    pub fn forced() -> Self {
        CheckInterval::Explicit(FORCED_CHECK_INTERVAL_SECS)
    }

    /// Explicit seconds, if any.
    pub fn seconds(&self) -> Option<u32> {
        match self {
            CheckInterval::Default => None,
            CheckInterval::Explicit(secs) => Some(*secs),
        }
    }
}

impl fmt::Display for CheckInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckInterval::Default => write!(f, "default"),
            CheckInterval::Explicit(secs) => write!(f, "{}s", secs),
        }
    }
}
