//! Application state for the API server

use crate::MergeService;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The merge pipeline
    pub service: Arc<MergeService>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<MergeService>) -> Self {
        Self { service }
    }
}
