//! HTTP handler for the VCS update endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{TriggerError, TriggerUpdateHandler};

use super::dto::{ErrorResponse, TriggerDoneResponse, TriggerFailedResponse, TriggerParams};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// View identifiers returned to the caller for each outcome.
#[derive(Debug, Clone)]
pub struct TriggerViews {
    /// Rendered when the request is rejected.
    pub view_name: String,
    /// Rendered when roots were processed.
    pub done_view_name: String,
}

#[derive(Clone)]
pub struct TriggerAppState {
    handler: Arc<TriggerUpdateHandler>,
    views: Arc<TriggerViews>,
}

impl TriggerAppState {
    pub fn new(handler: Arc<TriggerUpdateHandler>, views: TriggerViews) -> Self {
        Self {
            handler,
            views: Arc::new(views),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// ANY <trigger path>?id=..&build=..&pass=.. - Force a VCS change check
pub async fn trigger_update(
    State(state): State<TriggerAppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let cmd = TriggerParams::from_pairs(pairs).into_command();

    match state.handler.handle(cmd).await {
        Ok(result) => {
            let response =
                TriggerDoneResponse::new(state.views.done_view_name.clone(), result.triggered_builds);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_trigger_error(e, &state.views),
    }
}

fn handle_trigger_error(error: TriggerError, views: &TriggerViews) -> Response {
    let failed = || {
        Json(TriggerFailedResponse {
            view: views.view_name.clone(),
        })
    };

    match error {
        TriggerError::Unauthorized => (StatusCode::UNAUTHORIZED, failed()).into_response(),
        TriggerError::NoMatchingRoots => (StatusCode::NOT_FOUND, failed()).into_response(),
        TriggerError::Ci(_) | TriggerError::TaskFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("Internal server error")),
        )
            .into_response(),
    }
}
