//! MySQL author repository implementation.

use crate::{pool::DatabasePool, traits::AuthorRepository};
use async_trait::async_trait;
use folio_core::{Author, FolioResult};
use sqlx::{FromRow, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// MySQL author repository implementation.
#[derive(Clone)]
pub struct MySqlAuthorRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlAuthorRepository {
    /// Creates a new MySQL author repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of an author.
#[derive(Debug, FromRow)]
struct AuthorRow {
    id: i32,
    name: String,
    kind: String,
    age: i32,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            id: row.id,
            name: row.name,
            kind: row.kind,
            age: row.age,
        }
    }
}

#[async_trait]
impl AuthorRepository for MySqlAuthorRepository {
    async fn find_by_id(&self, id: i32) -> FolioResult<Option<Author>> {
        debug!("Finding author by id: {}", id);

        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, name, type AS kind, age
            FROM authors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Author::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> FolioResult<Vec<Author>> {
        debug!("Finding authors by ids: {:?}", ids);

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<'_, sqlx::MySql> =
            QueryBuilder::new("SELECT id, name, type AS kind, age FROM authors WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        query.push(") ORDER BY id");

        let rows: Vec<AuthorRow> = query
            .build_query_as()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Author::from).collect())
    }
}

impl std::fmt::Debug for MySqlAuthorRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlAuthorRepository").finish_non_exhaustive()
    }
}
