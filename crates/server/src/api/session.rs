//! Search session API handlers.
//!
//! Every handler answers with the session snapshot after applying its
//! change, so a client can render straight from the response.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use moviesearch_core::{FilterCriteria, ModalDismissal, SearchSession, SessionSnapshot};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetQueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseDetailsParams {
    #[serde(default)]
    pub reason: Option<ModalDismissal>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult = Result<Json<SessionSnapshot>, (StatusCode, Json<ErrorResponse>)>;

fn require_session(state: &AppState) -> Result<&SearchSession, (StatusCode, Json<ErrorResponse>)> {
    state.session().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Movie search is not configured: set an OMDb API key".to_string(),
            }),
        )
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = require_session(&state)?;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/session/query
///
/// Record a keystroke. The search itself runs after the debounce period;
/// watch the WebSocket feed or poll `GET /session` for results.
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetQueryRequest>,
) -> ApiResult {
    let session = require_session(&state)?;
    session.set_query(request.query);
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/session/query
pub async fn clear_query(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = require_session(&state)?;
    session.clear_query();
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/session/filters
pub async fn set_filters(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> ApiResult {
    let session = require_session(&state)?;
    session.set_criteria(criteria);
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/session/filters
pub async fn reset_filters(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = require_session(&state)?;
    session.reset_filters();
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/session/details/{id}
///
/// Open the detail modal. Waits for the full-plot lookup.
pub async fn open_details(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> ApiResult {
    let session = require_session(&state)?;
    if session.open_details(&imdb_id).await {
        Ok(Json(session.snapshot()))
    } else {
        debug!("Details for {} not shown", imdb_id);
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Details unavailable: {}", imdb_id),
            }),
        ))
    }
}

/// DELETE /api/v1/session/details?reason=escape|backdrop|close_button
pub async fn close_details(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CloseDetailsParams>,
) -> ApiResult {
    let session = require_session(&state)?;
    session.close_details(params.reason.unwrap_or(ModalDismissal::CloseButton));
    Ok(Json(session.snapshot()))
}
