//! Author entity.

use serde::{Deserialize, Serialize};

/// Author entity as stored in the `authors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Author {
    /// Unique identifier for the author.
    pub id: i32,

    /// Author's display name.
    pub name: String,

    /// Category of work the author is known for (fiction, poetry, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Author's age.
    pub age: i32,
}

impl Author {
    /// Creates a new author.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, kind: impl Into<String>, age: i32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            age,
        }
    }
}
