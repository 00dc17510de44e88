//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Book {
    /// Client-supplied identifier, immutable once stored
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
}

impl Book {
    /// Build a book with both timestamps set to now.
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        author: impl Into<String>,
        publisher: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            author: author.into(),
            publisher,
            created_date: now,
            last_modified_date: now,
        }
    }
}

/// One page of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub books: Vec<Book>,
    pub page: usize,
    /// Number of live books in the whole catalog, not just this page
    pub total_books: usize,
}

/// Create or update book request
///
/// Missing `title`/`author` deserialize as empty and a missing `id` as the nil
/// UUID, so validation can report every absent field at once.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub publisher: Option<String>,
}

impl From<BookRequest> for Book {
    fn from(req: BookRequest) -> Self {
        Book::new(req.id, req.title, req.author, req.publisher)
    }
}

/// Book entry in a list response
#[derive(Debug, Serialize, ToSchema)]
pub struct BookSummary {
    pub title: String,
    /// Absolute URL of the full record
    pub href: String,
}
