//! Application state for Axum handlers.

use folio_service::AuthorService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub author_service: Arc<dyn AuthorService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(author_service: Arc<dyn AuthorService>) -> Self {
        Self { author_service }
    }
}
