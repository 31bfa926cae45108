//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## CI Server Ports
//!
//! - `VcsRootStore` - Resolve VCS roots and read/write their check interval
//! - `BuildTypeStore` - List build configurations of a root and force checks
//!
//! Both are owned by the CI server. This service only orchestrates calls
//! into them.

mod build_type_store;
mod ci_error;
mod vcs_root_store;

pub use build_type_store::BuildTypeStore;
pub use ci_error::CiError;
pub use vcs_root_store::VcsRootStore;
