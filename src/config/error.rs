//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("CI timeout ({ci_secs}s) must be shorter than the request timeout ({request_secs}s)")]
    CiTimeoutExceedsRequestTimeout { ci_secs: u64, request_secs: u64 },

    #[error("Trigger path must start with '/'")]
    InvalidTriggerPath,

    #[error("View name cannot be empty")]
    EmptyViewName,

    #[error("Invalid CI server URL format")]
    InvalidCiBaseUrl,

    #[error("CI server URL must use HTTPS in production")]
    CiBaseUrlMustBeHttps,

    #[error("In-memory CI backend cannot be used in production")]
    InMemoryBackendInProduction,
}
