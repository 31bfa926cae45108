//! HTTP adapter for the VCS update endpoint.
//!
//! A single route, bound to a configurable path and accepting any method:
//! - `?id=<root>[&id=<root>...]` - VCS roots to trigger
//! - `&build=<build type>[&build=...]` - optional configuration filter
//! - `&pass=<secret>` - shared password, when one is configured

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, TriggerDoneResponse, TriggerFailedResponse, TriggerParams};
pub use handlers::{trigger_update, TriggerAppState, TriggerViews};
pub use routes::trigger_routes;
