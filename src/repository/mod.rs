//! Repository layer for book storage

pub mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, Library};

pub use memory::InMemoryBookRepository;

/// Storage errors surfaced to the service layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No live book has this identifier
    #[error("book {0} does not exist")]
    NotFound(Uuid),

    /// Failure of the underlying storage; never produced by the in-memory store
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Book storage contract.
///
/// Every call is synchronous and completes without suspending, so handlers
/// may call straight into it from async code.
#[cfg_attr(test, mockall::automock)]
pub trait BookRepository: Send + Sync {
    /// Store a book, stamping its creation and modification times.
    ///
    /// An id that is already live is treated as an update of that record:
    /// it keeps its position and `created_date`.
    fn create(&self, book: Book) -> RepositoryResult<Book>;

    /// Fetch a copy of the book with the given id.
    fn get(&self, id: Uuid) -> RepositoryResult<Book>;

    /// Fetch page `page_index` of `page_size` books in insertion order.
    ///
    /// A page past the end is empty, not an error.
    fn list(&self, page_size: usize, page_index: usize) -> RepositoryResult<Library>;

    /// Replace title, author and publisher of an existing book.
    fn update(&self, book: Book) -> RepositoryResult<Book>;

    /// Remove a book, preserving the order of the remaining ones.
    fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
