//! Author service implementation.

use crate::author_service::AuthorService;
use crate::dto::AuthorResponse;
use async_trait::async_trait;
use folio_core::{FolioError, FolioResult};
use folio_repository::AuthorRepository;
use std::sync::Arc;
use tracing::debug;

/// Author service implementation backed by a repository.
pub struct AuthorServiceImpl<R: AuthorRepository> {
    author_repository: Arc<R>,
}

impl<R: AuthorRepository> AuthorServiceImpl<R> {
    /// Creates a new author service.
    pub fn new(author_repository: Arc<R>) -> Self {
        Self { author_repository }
    }
}

#[async_trait]
impl<R: AuthorRepository + 'static> AuthorService for AuthorServiceImpl<R> {
    async fn get_author(&self, id: i32) -> FolioResult<AuthorResponse> {
        debug!("Getting author: {}", id);

        let author = self
            .author_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Author", id))?;

        Ok(AuthorResponse::from(author))
    }

    async fn get_authors(&self, ids: &[i32]) -> FolioResult<Vec<AuthorResponse>> {
        debug!("Getting {} authors", ids.len());

        let authors = self.author_repository.find_by_ids(ids).await?;
        Ok(authors.into_iter().map(AuthorResponse::from).collect())
    }
}

impl<R: AuthorRepository> std::fmt::Debug for AuthorServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorServiceImpl").finish_non_exhaustive()
    }
}
