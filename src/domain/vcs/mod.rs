//! VCS roots and the build configurations that poll them.
//!
//! These are snapshots of objects owned by the CI server. Nothing here
//! mutates the server; mutation goes through the ports.

mod build_type;
mod interval;
mod root;

pub use build_type::BuildConfiguration;
pub use interval::{CheckInterval, FORCED_CHECK_INTERVAL_SECS};
pub use root::VcsRoot;
