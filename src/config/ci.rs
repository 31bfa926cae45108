//! CI server configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::ci::TeamCityConfig;

/// Which CI server implementation backs the ports
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CiBackend {
    /// Empty in-process server, for local development
    #[default]
    Memory,
    /// TeamCity REST API
    TeamCity,
}

/// CI server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CiConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: CiBackend,

    /// Server root URL (required for `teamcity`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Access token for the REST API
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CiConfig {
    /// Get outbound request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client configuration for the TeamCity adapter
    pub fn teamcity_config(&self) -> Result<TeamCityConfig, ValidationError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ValidationError::MissingRequired("CI__BASE_URL"))?;

        let config = TeamCityConfig::new(base_url).with_timeout(self.timeout());
        Ok(match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        })
    }

    /// Validate CI configuration
    ///
    /// The TeamCity backend needs an http(s) URL, HTTPS in production.
    /// Production may not run on the in-memory backend.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        match self.backend {
            CiBackend::Memory => {
                if *environment == Environment::Production {
                    return Err(ValidationError::InMemoryBackendInProduction);
                }
            }
            CiBackend::TeamCity => {
                let url = self
                    .base_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("CI__BASE_URL"))?;

                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidCiBaseUrl);
                }
                if *environment == Environment::Production && !url.starts_with("https://") {
                    return Err(ValidationError::CiBaseUrlMustBeHttps);
                }
            }
        }
        Ok(())
    }
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            backend: CiBackend::default(),
            base_url: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
