//! In-process score store for local runs and tests.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ScoreRecord, ScoreStore, StoreError, StoredScore, WriteMode};

/// Key used for overwrite-mode writes, mirroring the hosted record path's last segment.
pub const OVERWRITE_KEY: &str = "motorTest";

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, ScoreRecord>>,
    write_mode: WriteMode,
}

impl MemoryStore {
    #[must_use]
    pub fn new(write_mode: WriteMode) -> Self {
        Self { records: RwLock::new(BTreeMap::new()), write_mode }
    }
}

#[async_trait::async_trait]
impl ScoreStore for MemoryStore {
    async fn write(&self, record: &ScoreRecord) -> Result<String, StoreError> {
        let key = match self.write_mode {
            WriteMode::Overwrite => OVERWRITE_KEY.to_string(),
            WriteMode::Append => Uuid::new_v4().to_string(),
        };
        self.records
            .write()
            .await
            .insert(key.clone(), record.clone());
        Ok(key)
    }

    async fn list(&self) -> Result<Vec<StoredScore>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|(id, record)| StoredScore { id: id.clone(), record: record.clone() })
            .collect())
    }
}
