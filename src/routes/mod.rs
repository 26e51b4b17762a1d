//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under a single Axum router: score
//! persistence (`/api/scores`), the shape catalog and one-off scoring
//! (`/api/shapes`), and server-side assessment sessions (`/api/sessions`).
//! Error responses share one shape: `{ "error": "<message>" }`.

pub mod scores;
pub mod sessions;
pub mod shapes;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/scores", get(scores::get_scores).post(scores::post_score))
        .route("/api/shapes", get(shapes::list_shapes))
        .route("/api/shapes/{kind}/score", post(shapes::score_shape))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/{id}/stroke", post(sessions::submit_stroke))
        .route("/api/sessions/{id}/reset", post(sessions::reset_session))
        .route("/api/sessions/{id}/next", post(sessions::next_shape))
        .route("/api/sessions/{id}/restart", post(sessions::restart_session))
        .route("/api/sessions/{id}/submit", post(sessions::submit_session))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
