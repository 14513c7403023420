//! Handler metadata registry.

use folio_core::{FolioError, FolioResult};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::error;

/// Metadata recorded for a routed handler operation.
#[derive(Debug, Clone)]
pub struct HandlerMeta {
    /// Declaring module plus operation name, e.g.
    /// `author_controller::get_author`.
    pub name: &'static str,
    /// Handler-boundary logging opt-out.
    pub skip_logging: bool,
}

impl HandlerMeta {
    /// Creates metadata for a handler operation.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            skip_logging: false,
        }
    }

    /// Marks the operation as opted out of handler-boundary logging.
    #[must_use]
    pub fn skip_logging(mut self) -> Self {
        self.skip_logging = true;
        self
    }
}

/// Registry mapping exact route paths to handler metadata.
///
/// Populated while the router is built; read-only at request time.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, HandlerMeta>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records metadata for a route path.
    pub fn register(&self, path: impl Into<String>, meta: HandlerMeta) {
        match self.handlers.write() {
            Ok(mut handlers) => {
                handlers.insert(path.into(), meta);
            }
            Err(e) => error!("Failed to register handler metadata: {}", e),
        }
    }

    /// Resolves metadata for a route path.
    ///
    /// `Ok(None)` means the path is not a registered handler operation;
    /// `Err` means the registry itself could not be read.
    pub fn resolve(&self, path: &str) -> FolioResult<Option<HandlerMeta>> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| FolioError::internal("handler registry lock poisoned"))?;
        Ok(handlers.get(path).cloned())
    }
}
