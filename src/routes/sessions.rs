//! Assessment session routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiError;
use super::shapes::CanvasParams;
use crate::geometry::Point;
use crate::services::scores::ScoresError;
use crate::services::session::{self, SessionError, SessionView};
use crate::shapes::CanvasSize;
use crate::state::AppState;

pub(crate) fn session_error_to_api(err: &SessionError) -> ApiError {
    let status = match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::NoScore
        | SessionError::NotInProgress
        | SessionError::NotCompleted
        | SessionError::SubmitInFlight
        | SessionError::AlreadySubmitted => StatusCode::CONFLICT,
        SessionError::InvalidCanvas | SessionError::Score(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Submit(ScoresError::Unavailable) => {
            return ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, session::UNAVAILABLE_MESSAGE);
        }
        SessionError::Submit(ScoresError::Store(_)) => {
            return ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, session::SUBMIT_FAILED_MESSAGE);
        }
    };
    ApiError::new(status, err.to_string())
}

/// Canvas for `params`, filling missing sides from `fallback`.
fn canvas_or(params: &CanvasParams, fallback: CanvasSize) -> Result<CanvasSize, SessionError> {
    CanvasSize::new(params.width.unwrap_or(fallback.width), params.height.unwrap_or(fallback.height))
        .ok_or(SessionError::InvalidCanvas)
}

/// `POST /api/sessions` — start an assessment on the first shape.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CanvasParams>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let canvas = canvas_or(&body, CanvasSize::default()).map_err(|e| session_error_to_api(&e))?;
    let view = state.sessions.create(canvas).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/sessions/{id}`
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    state.sessions.view(id).await.map(Json).map_err(|e| session_error_to_api(&e))
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await.map_err(|e| session_error_to_api(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StrokeBody {
    /// Current canvas size, when it changed since the last call.
    #[serde(flatten)]
    pub canvas: CanvasParams,
    pub points: Vec<Point>,
}

/// `POST /api/sessions/{id}/stroke` — trace a full stroke on the current shape.
///
/// Strokes shorter than two points leave the current score unchanged.
pub async fn submit_stroke(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StrokeBody>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .sessions
        .update(id, |s| {
            if body.canvas.width.is_some() || body.canvas.height.is_some() {
                let canvas = canvas_or(&body.canvas, s.canvas)?;
                s.resize(canvas);
            }
            s.trace(&body.points)?;
            Ok(s.view())
        })
        .await
        .map(Json)
        .map_err(|e| session_error_to_api(&e))
}

/// `POST /api/sessions/{id}/reset` — clear the current stroke and score.
pub async fn reset_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, id, session::Session::reset).await
}

/// `POST /api/sessions/{id}/next` — record the score and move on.
pub async fn next_shape(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, id, session::Session::advance).await
}

/// `POST /api/sessions/{id}/restart` — start over from the first shape.
pub async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    apply(&state, id, session::Session::start_over).await
}

/// `POST /api/sessions/{id}/submit` — persist the final result.
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    session::submit_session(&state, id)
        .await
        .map(Json)
        .map_err(|e| session_error_to_api(&e))
}

async fn apply(
    state: &AppState,
    id: Uuid,
    transition: fn(&mut session::Session) -> Result<(), SessionError>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .sessions
        .update(id, |s| {
            transition(s)?;
            Ok(s.view())
        })
        .await
        .map(Json)
        .map_err(|e| session_error_to_api(&e))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
