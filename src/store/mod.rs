//! Score storage and the `ScoreStore` seam.
//!
//! DESIGN
//! ======
//! Score records live in a hosted realtime JSON database under a single
//! root node (`scores`). The default write mode overwrites one fixed child
//! (`scores/motorTest`), so the store holds at most one record; append mode
//! writes each record under a fresh key instead. Reads return every child of
//! the root with its key attached as `id`.
//!
//! Handlers never reach a global client: `main` constructs a backend and
//! injects it into `AppState` as `Option<Arc<dyn ScoreStore>>`, with `None`
//! meaning the database failed to initialize.

pub mod memory;
pub mod realtime_db;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use memory::MemoryStore;
pub use realtime_db::RealtimeDbClient;

// =============================================================================
// ERRORS
// =============================================================================

/// Failure to construct a store client.
#[derive(Debug, thiserror::Error)]
pub enum StoreInitError {
    #[error("invalid database URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid record path '{0}'")]
    InvalidPath(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Failure of a single read or write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database request failed: {0}")]
    Request(String),
    #[error("database responded with status {status}")]
    Status { status: u16, body: String },
    #[error("database response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// RECORDS
// =============================================================================

/// One persisted assessment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub name: String,
    pub final_score: f64,
    #[serde(default)]
    pub individual_scores: Vec<f64>,
    /// RFC 3339 UTC timestamp of the write.
    pub timestamp: String,
}

/// A record as read back, tagged with its storage key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredScore {
    pub id: String,
    #[serde(flatten)]
    pub record: ScoreRecord,
}

/// Where writes land under the score root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Every write replaces the record at the fixed record path.
    #[default]
    Overwrite,
    /// Every write creates a new child with a generated key.
    Append,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Read/write access to persisted score records.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist `record`, returning the key it was stored under.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn write(&self, record: &ScoreRecord) -> Result<String, StoreError>;

    /// All stored records in storage-key order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the read fails or the payload is malformed.
    async fn list(&self) -> Result<Vec<StoredScore>, StoreError>;
}

/// Convert a root-node snapshot (`{ key: record, ... }` or `null`) into records.
///
/// Children that do not decode as a [`ScoreRecord`] are skipped with a warning.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if the snapshot is neither `null` nor an object.
pub fn records_from_snapshot(snapshot: serde_json::Value) -> Result<Vec<StoredScore>, StoreError> {
    let children = match snapshot {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Object(map) => map,
        other => return Err(StoreError::Parse(format!("expected object at score root, got {other}"))),
    };

    let mut scores = Vec::with_capacity(children.len());
    for (id, value) in children {
        match serde_json::from_value::<ScoreRecord>(value) {
            Ok(record) => scores.push(StoredScore { id, record }),
            Err(e) => warn!(%id, error = %e, "skipping malformed score record"),
        }
    }
    Ok(scores)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
