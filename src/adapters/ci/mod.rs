//! CI server adapters.
//!
//! - `in_memory` - Self-contained server for development and tests
//! - `teamcity` - REST client for a TeamCity-compatible server

mod in_memory;
mod teamcity;

pub use in_memory::{InMemoryCiServer, IntervalChange};
pub use teamcity::{TeamCityClient, TeamCityConfig};
