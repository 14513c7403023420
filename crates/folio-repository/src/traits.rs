//! Repository trait definitions.

use async_trait::async_trait;
use folio_core::{Author, FolioResult};

/// Author repository trait.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Finds an author by id.
    async fn find_by_id(&self, id: i32) -> FolioResult<Option<Author>>;

    /// Finds all authors matching the given ids.
    ///
    /// Unknown ids are simply absent from the result; an empty input yields
    /// an empty result without touching the database.
    async fn find_by_ids(&self, ids: &[i32]) -> FolioResult<Vec<Author>>;
}
