//! Hosted realtime database client (REST).
//!
//! Thin HTTP wrapper over the database's JSON REST interface: a node at
//! path `a/b` is addressed as `{base}/a/b.json`, `PUT` replaces it, and `GET`
//! returns its subtree (`null` when absent). An optional auth token is sent
//! as the `auth` query parameter.

use std::time::Duration;

use reqwest::Url;
use tracing::info;
use uuid::Uuid;

use super::{ScoreRecord, ScoreStore, StoreError, StoreInitError, StoredScore, WriteMode, records_from_snapshot};
use crate::config::RealtimeDbConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct RealtimeDbClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
    root_path: String,
    record_path: String,
    write_mode: WriteMode,
}

impl RealtimeDbClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreInitError`] if the base URL is not an absolute
    /// `http(s)` URL, a path contains characters the database forbids in
    /// keys, or the HTTP client cannot be built.
    pub fn new(config: &RealtimeDbConfig) -> Result<Self, StoreInitError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreInitError::InvalidUrl { url: config.base_url.clone(), reason: e.to_string() })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(StoreInitError::InvalidUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }
        validate_path(&config.root_path)?;
        validate_path(&config.record_path)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreInitError::HttpClientBuild(e.to_string()))?;

        info!(base_url = %base_url, root = %config.root_path, "realtime database client initialized");
        Ok(Self {
            http,
            base_url,
            auth_token: config.auth_token.clone(),
            root_path: config.root_path.clone(),
            record_path: config.record_path.clone(),
            write_mode: config.write_mode,
        })
    }

    /// REST URL for the node at `path`.
    fn node_url(&self, path: &str) -> String {
        format!("{}/{path}.json", self.base_url.as_str().trim_end_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.node_url(path));
        match &self.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }

    /// Path and key the next write lands on.
    fn write_target(&self) -> (String, String) {
        match self.write_mode {
            WriteMode::Overwrite => {
                let key = self
                    .record_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(&self.record_path)
                    .to_string();
                (self.record_path.clone(), key)
            }
            WriteMode::Append => {
                let key = Uuid::new_v4().to_string();
                (format!("{}/{key}", self.root_path), key)
            }
        }
    }
}

#[async_trait::async_trait]
impl ScoreStore for RealtimeDbClient {
    async fn write(&self, record: &ScoreRecord) -> Result<String, StoreError> {
        let (path, key) = self.write_target();
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status: status.as_u16(), body });
        }
        Ok(key)
    }

    async fn list(&self) -> Result<Vec<StoredScore>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &self.root_path)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::Status { status: status.as_u16(), body: text });
        }

        let snapshot: serde_json::Value = serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        records_from_snapshot(snapshot)
    }
}

/// Reject empty paths, empty segments, and characters invalid in database keys.
fn validate_path(path: &str) -> Result<(), StoreInitError> {
    let valid = !path.is_empty()
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && !seg.contains(['.', '$', '#', '[', ']']));
    if valid { Ok(()) } else { Err(StoreInitError::InvalidPath(path.to_string())) }
}

#[cfg(test)]
#[path = "realtime_db_test.rs"]
mod tests;
