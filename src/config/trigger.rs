//! Trigger endpoint configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::http::TriggerViews;
use crate::application::TriggerSettings;

/// Trigger endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    /// URL path the endpoint is bound to
    #[serde(default = "default_path")]
    pub path: String,

    /// View rendered when a request is rejected
    #[serde(default = "default_view_name")]
    pub view_name: String,

    /// View rendered after roots were processed
    #[serde(default = "default_done_view_name")]
    pub done_view_name: String,

    /// Shared password callers must send as `pass`; empty disables the check
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl TriggerConfig {
    /// Handler settings derived from this configuration
    pub fn settings(&self) -> TriggerSettings {
        TriggerSettings {
            password: self.password.clone(),
        }
    }

    /// View identifiers for the HTTP adapter
    pub fn views(&self) -> TriggerViews {
        TriggerViews {
            view_name: self.view_name.clone(),
            done_view_name: self.done_view_name.clone(),
        }
    }

    /// Validate trigger configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::InvalidTriggerPath);
        }
        if self.view_name.trim().is_empty() || self.done_view_name.trim().is_empty() {
            return Err(ValidationError::EmptyViewName);
        }
        Ok(())
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            view_name: default_view_name(),
            done_view_name: default_done_view_name(),
            password: None,
        }
    }
}

fn default_path() -> String {
    "/vcsupdate".to_string()
}

fn default_view_name() -> String {
    "vcsupdate/failure.jsp".to_string()
}

fn default_done_view_name() -> String {
    "vcsupdate/done.jsp".to_string()
}
