//! HTTP DTOs for the VCS update endpoint.
//!
//! These types decouple the HTTP API from application types.

use serde::Serialize;

use crate::application::TriggerUpdateCommand;
use crate::domain::foundation::{BuildTypeId, VcsRootId};

const ID_PARAM: &str = "id";
const BUILD_PARAM: &str = "build";
const PASS_PARAM: &str = "pass";

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Raw query parameters of a trigger request.
///
/// Parameters repeat, so they are collected from the decoded key/value
/// pairs rather than deserialized into a struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerParams {
    pub ids: Vec<String>,
    /// `None` when no `build` parameter was sent at all.
    pub builds: Option<Vec<String>>,
    /// First `pass` value.
    pub pass: Option<String>,
}

impl TriggerParams {
    /// Collects recognised parameters, ignoring everything else.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                ID_PARAM => params.ids.push(value),
                BUILD_PARAM => params.builds.get_or_insert_with(Vec::new).push(value),
                PASS_PARAM => {
                    if params.pass.is_none() {
                        params.pass = Some(value);
                    }
                }
                _ => {}
            }
        }
        params
    }

    /// Builds the command. Blank or malformed ids can never resolve and are dropped.
    pub fn into_command(self) -> TriggerUpdateCommand {
        let mut cmd =
            TriggerUpdateCommand::new(self.ids.into_iter().filter_map(|id| VcsRootId::new(id).ok()));
        if let Some(builds) = self.builds {
            cmd = cmd.with_build_filter(
                builds
                    .into_iter()
                    .filter_map(|id| BuildTypeId::new(id).ok()),
            );
        }
        if let Some(pass) = self.pass {
            cmd = cmd.with_password(pass);
        }
        cmd
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Rendered when at least one root was processed.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerDoneResponse {
    pub view: String,
    /// Triggered names as a single bracketed list, e.g. `[P :: A, P :: B]`.
    #[serde(rename = "updatedVCSBuilds")]
    pub updated_vcs_builds: String,
    pub builds: Vec<String>,
}

impl TriggerDoneResponse {
    pub fn new(view: impl Into<String>, builds: Vec<String>) -> Self {
        Self {
            view: view.into(),
            updated_vcs_builds: format!("[{}]", builds.join(", ")),
            builds,
        }
    }
}

/// Rendered for unauthorized requests and requests matching no root.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerFailedResponse {
    pub view: String,
}

/// Error body for fatal failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
