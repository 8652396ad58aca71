use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A book row as stored and as exposed over the API.
///
/// Serializes to exactly `{id, title, author, preview}`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the store on insert
    pub id: i64,
    pub title: String,
    pub author: String,
    pub preview: Option<String>,
}

/// Fields accepted by create and update.
///
/// Every field is optional at this boundary: a missing key is passed through
/// as `None` and the store decides whether that is acceptable. Updates write
/// all three fields, so an omitted field is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub preview: Option<String>,
}

impl BookPayload {
    pub fn new(title: &str, author: &str, preview: Option<&str>) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            preview: preview.map(str::to_string),
        }
    }
}
