//! HTTP adapters - REST API implementations.
//!
//! `router` assembles the endpoint routes with the tracing and timeout
//! layers shared by every request.

pub mod trigger;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use trigger::{trigger_routes, TriggerAppState, TriggerViews};

/// Builds the application router.
pub fn router(path: &str, state: TriggerAppState, request_timeout: Duration) -> Router {
    trigger_routes(path, state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
