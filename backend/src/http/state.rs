//! Application state for the HTTP server.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::services::{QueryTracker, SelectionState, Session};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded data and cached alignments, read-only after startup
    pub session: Arc<Session>,
    /// Streets the user has clicked; one toggle at a time
    pub selection: Arc<RwLock<SelectionState>>,
    pub queries: QueryTracker,
}

impl AppState {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            selection: Arc::new(RwLock::new(SelectionState::new())),
            queries: QueryTracker::new(),
        }
    }

    /// Copy of the current selection for a query.
    pub fn selection_snapshot(&self) -> SelectionState {
        self.selection.read().clone()
    }
}
