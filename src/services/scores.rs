//! Score service: building, saving and listing score records.
//!
//! ERROR HANDLING
//! ==============
//! A store that failed to initialize is `None` in `AppState`; every operation
//! here reports that as [`ScoresError::Unavailable`] without attempting I/O.
//! Store failures are logged once here and passed up unchanged. Nothing is
//! retried.

use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info};

use crate::store::{ScoreRecord, ScoreStore, StoreError, StoredScore};

pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, thiserror::Error)]
pub enum ScoresError {
    #[error("score database is not available")]
    Unavailable,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Build a record stamped with the current UTC time.
///
/// Surrounding whitespace is trimmed; a missing or blank name becomes
/// `"Anonymous"`.
#[must_use]
pub fn build_record(name: Option<&str>, final_score: f64, individual_scores: Vec<f64>) -> ScoreRecord {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string();
    ScoreRecord { name, final_score, individual_scores, timestamp: now_rfc3339() }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Persist `record`, returning its storage key.
///
/// # Errors
///
/// Returns [`ScoresError::Unavailable`] without a store, or the store's error.
pub async fn save_score(store: Option<&Arc<dyn ScoreStore>>, record: &ScoreRecord) -> Result<String, ScoresError> {
    let store = store.ok_or(ScoresError::Unavailable)?;
    match store.write(record).await {
        Ok(key) => {
            info!(%key, final_score = record.final_score, "score saved");
            Ok(key)
        }
        Err(e) => {
            error!(error = %e, "error saving score");
            Err(e.into())
        }
    }
}

/// All stored scores, highest `finalScore` first.
///
/// # Errors
///
/// Returns [`ScoresError::Unavailable`] without a store, or the store's error.
pub async fn list_scores(store: Option<&Arc<dyn ScoreStore>>) -> Result<Vec<StoredScore>, ScoresError> {
    let store = store.ok_or(ScoresError::Unavailable)?;
    let mut scores = store.list().await.map_err(|e| {
        error!(error = %e, "error fetching scores");
        ScoresError::from(e)
    })?;
    sort_by_score_desc(&mut scores);
    Ok(scores)
}

/// Stable sort, highest `finalScore` first.
pub fn sort_by_score_desc(scores: &mut [StoredScore]) {
    scores.sort_by(|a, b| b.record.final_score.total_cmp(&a.record.final_score));
}

#[cfg(test)]
#[path = "scores_test.rs"]
mod tests;
