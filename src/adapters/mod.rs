//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ci` - CI server implementations (in-memory, TeamCity REST)
//! - `http` - Inbound HTTP endpoint

pub mod ci;
pub mod http;

pub use ci::{InMemoryCiServer, TeamCityClient, TeamCityConfig};
