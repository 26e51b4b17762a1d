//! Score persistence routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

use super::ApiError;
use crate::services::scores::{self, ScoresError};
use crate::state::AppState;
use crate::store::StoredScore;

pub const INVALID_SCORE_MESSAGE: &str = "Invalid score format";
pub const UNAVAILABLE_MESSAGE: &str = "Score database is not available";

/// Validated `POST /api/scores` body.
#[derive(Debug, PartialEq)]
pub struct SaveScoreBody {
    pub name: Option<String>,
    pub final_score: f64,
    pub individual_scores: Vec<f64>,
}

/// Pull `{ name?, finalScore, individualScores? }` out of a JSON body.
///
/// `finalScore` must be a JSON number. `individualScores`, when present and
/// not null, must be an array of numbers. A non-string `name` is ignored.
pub(crate) fn parse_save_body(body: &Value) -> Option<SaveScoreBody> {
    let final_score = body.get("finalScore")?.as_f64()?;
    let name = body.get("name").and_then(Value::as_str).map(str::to_owned);
    let individual_scores = match body.get("individualScores") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>()?,
        Some(_) => return None,
    };
    Some(SaveScoreBody { name, final_score, individual_scores })
}

fn scores_error(err: &ScoresError, failure_message: &str) -> ApiError {
    match err {
        ScoresError::Unavailable => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, UNAVAILABLE_MESSAGE),
        ScoresError::Store(_) => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message),
    }
}

/// `POST /api/scores` — save a final score.
pub async fn post_score(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    if state.store.is_none() {
        return Err(scores_error(&ScoresError::Unavailable, ""));
    }
    let Ok(Json(body)) = body else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, INVALID_SCORE_MESSAGE));
    };
    let Some(body) = parse_save_body(&body) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, INVALID_SCORE_MESSAGE));
    };

    let record = scores::build_record(body.name.as_deref(), body.final_score, body.individual_scores);
    scores::save_score(state.store.as_ref(), &record)
        .await
        .map_err(|e| scores_error(&e, "Failed to save score"))?;

    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(serde::Serialize)]
pub struct ScoresResponse {
    pub scores: Vec<StoredScore>,
}

/// `GET /api/scores` — all stored scores, highest first.
pub async fn get_scores(State(state): State<AppState>) -> Result<Json<ScoresResponse>, ApiError> {
    let scores = scores::list_scores(state.store.as_ref())
        .await
        .map_err(|e| scores_error(&e, "Failed to fetch scores"))?;
    Ok(Json(ScoresResponse { scores }))
}

#[cfg(test)]
#[path = "scores_test.rs"]
mod tests;
