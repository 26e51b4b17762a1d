//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the score store handle and the registry of live assessment
//! sessions. The store is optional: `None` means the database client failed
//! to initialize, and score routes answer with a 500 instead of the process
//! refusing to start.

use std::sync::Arc;

use crate::services::session::SessionRegistry;
use crate::store::ScoreStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Score persistence. `None` if the database client could not be built.
    pub store: Option<Arc<dyn ScoreStore>>,
    pub sessions: SessionRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(store: Option<Arc<dyn ScoreStore>>, sessions: SessionRegistry) -> Self {
        Self { store, sessions }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
