//! Author service trait definition.

use crate::dto::AuthorResponse;
use async_trait::async_trait;
use folio_core::FolioResult;

/// Author service trait.
#[async_trait]
pub trait AuthorService: Send + Sync {
    /// Gets an author by id.
    async fn get_author(&self, id: i32) -> FolioResult<AuthorResponse>;

    /// Gets all authors matching the given ids.
    async fn get_authors(&self, ids: &[i32]) -> FolioResult<Vec<AuthorResponse>>;
}
