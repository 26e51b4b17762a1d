mod config;
mod geometry;
mod routes;
mod scoring;
mod services;
mod shapes;
mod state;
mod store;

use std::sync::Arc;
use std::time::Duration;

use config::{AppConfig, StoreKind};
use services::session::SessionRegistry;
use store::{MemoryStore, RealtimeDbClient, ScoreStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");

    // Store init is non-fatal: score routes answer 500 while it is missing.
    let store = build_store(&config);
    let sessions = SessionRegistry::with_idle_timeout(Duration::from_secs(config.session_idle_secs));
    let state = state::AppState::new(store, sessions);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, store = ?config.store, "motortrace listening");
    axum::serve(listener, app).await.expect("server failed");
}

fn build_store(config: &AppConfig) -> Option<Arc<dyn ScoreStore>> {
    match (config.store, &config.realtime_db) {
        (StoreKind::RealtimeDb, Some(db)) => match RealtimeDbClient::new(db) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "score database unavailable; score submission disabled");
                None
            }
        },
        (StoreKind::RealtimeDb, None) => {
            tracing::warn!("realtime database selected without settings; score submission disabled");
            None
        }
        (StoreKind::Memory, _) => {
            tracing::info!(write_mode = ?config.write_mode, "using in-memory score store");
            Some(Arc::new(MemoryStore::new(config.write_mode)))
        }
    }
}
