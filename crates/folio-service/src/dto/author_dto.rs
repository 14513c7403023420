//! Author-related DTOs.

use folio_core::Author;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Author response DTO.
///
/// Serializes exactly like the [`Author`] entity; the handler log relies on
/// this shape for its "Response Args" line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub age: i32,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            kind: author.kind,
            age: author.age,
        }
    }
}
