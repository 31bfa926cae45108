//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `VCS_UPDATE_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use vcs_update::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}:{}", config.server.host, config.server.port);
//! ```

mod ci;
mod error;
mod server;
mod trigger;

pub use ci::{CiBackend, CiConfig};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use trigger::TriggerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a development
/// setup backed by the in-memory CI server.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Trigger endpoint configuration (path, views, password)
    #[serde(default)]
    pub trigger: TriggerConfig,

    /// CI server configuration (backend, URL, token)
    #[serde(default)]
    pub ci: CiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VCS_UPDATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `VCS_UPDATE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `VCS_UPDATE__TRIGGER__PASSWORD=...` -> `trigger.password = ...`
    /// - `VCS_UPDATE__CI__BASE_URL=...` -> `ci.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VCS_UPDATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.trigger.validate()?;
        self.ci.validate(&self.server.environment)?;

        // A single CI call must fit inside one request
        if self.ci.timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::CiTimeoutExceedsRequestTimeout {
                ci_secs: self.ci.timeout_secs,
                request_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
