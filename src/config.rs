//! Service configuration parsed from environment variables.

use crate::store::WriteMode;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ROOT_PATH: &str = "scores";
pub const DEFAULT_RECORD_PATH: &str = "scores/motorTest";
pub const DEFAULT_STORE_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORE_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("missing required env var {var}")]
    Missing { var: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    RealtimeDb,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the hosted realtime database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeDbConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub root_path: String,
    pub record_path: String,
    pub write_mode: WriteMode,
    pub timeouts: StoreTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreKind,
    /// Present when `store` is [`StoreKind::RealtimeDb`].
    pub realtime_db: Option<RealtimeDbConfig>,
    pub write_mode: WriteMode,
    /// Assessment sessions untouched this long are evicted.
    pub session_idle_secs: u64,
}

impl AppConfig {
    /// Build typed service config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SCORE_STORE`: `realtime_db` (default) or `memory`
    /// - `SCORE_WRITE_MODE`: `overwrite` (default) or `append`
    /// - `SESSION_IDLE_SECS`: default 1800
    ///
    /// Realtime DB settings are read only when `SCORE_STORE=realtime_db`;
    /// see [`RealtimeDbConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error for unknown enum values or a missing database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT);
        let store = parse_store_kind(std::env::var("SCORE_STORE").ok().as_deref())?;
        let write_mode = parse_write_mode(std::env::var("SCORE_WRITE_MODE").ok().as_deref())?;
        let realtime_db = match store {
            StoreKind::RealtimeDb => Some(RealtimeDbConfig::from_env(write_mode)?),
            StoreKind::Memory => None,
        };

        let session_idle_secs = env_parse("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS);

        Ok(Self { port, store, realtime_db, write_mode, session_idle_secs })
    }
}

impl RealtimeDbConfig {
    /// Required:
    /// - `REALTIME_DB_URL`
    ///
    /// Optional:
    /// - `REALTIME_DB_AUTH_ENV`: names the env var holding the auth token
    /// - `SCORE_ROOT_PATH`: default `scores`
    /// - `SCORE_RECORD_PATH`: default `scores/motorTest`
    /// - `STORE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `STORE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a named token variable is missing.
    pub fn from_env(write_mode: WriteMode) -> Result<Self, ConfigError> {
        let base_url = std::env::var("REALTIME_DB_URL")
            .map_err(|_| ConfigError::Missing { var: "REALTIME_DB_URL".into() })?
            .trim_end_matches('/')
            .to_string();

        let auth_token = match std::env::var("REALTIME_DB_AUTH_ENV") {
            Ok(token_var) => Some(std::env::var(&token_var).map_err(|_| ConfigError::Missing { var: token_var })?),
            Err(_) => None,
        };

        let root_path = env_path("SCORE_ROOT_PATH", DEFAULT_ROOT_PATH);
        let record_path = env_path("SCORE_RECORD_PATH", DEFAULT_RECORD_PATH);
        let timeouts = StoreTimeouts {
            request_secs: env_parse("STORE_REQUEST_TIMEOUT_SECS", DEFAULT_STORE_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("STORE_CONNECT_TIMEOUT_SECS", DEFAULT_STORE_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, auth_token, root_path, record_path, write_mode, timeouts })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_path(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim_matches('/')
        .to_string()
}

fn parse_store_kind(raw: Option<&str>) -> Result<StoreKind, ConfigError> {
    match raw.unwrap_or("realtime_db") {
        "realtime_db" => Ok(StoreKind::RealtimeDb),
        "memory" => Ok(StoreKind::Memory),
        other => Err(ConfigError::Parse(format!("unknown SCORE_STORE: {other}"))),
    }
}

fn parse_write_mode(raw: Option<&str>) -> Result<WriteMode, ConfigError> {
    match raw.unwrap_or("overwrite") {
        "overwrite" => Ok(WriteMode::Overwrite),
        "append" => Ok(WriteMode::Append),
        other => Err(ConfigError::Parse(format!(
            "unsupported SCORE_WRITE_MODE '{other}' (expected 'overwrite' or 'append')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
