//! Application state for the web layer.

use std::sync::Arc;

use crate::query::QueryExecutor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query executor over the loaded datasets
    pub executor: Arc<QueryExecutor>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }
}
