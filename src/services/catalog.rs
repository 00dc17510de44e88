//! Catalog management service

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRequest, Library},
    repository::BookRepository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// List one page of books
    pub fn list_books(&self, page_size: usize, page_index: usize) -> AppResult<Library> {
        let library = self.repository.list(page_size, page_index)?;
        tracing::debug!(
            page_size,
            page_index,
            returned = library.books.len(),
            total = library.total_books,
            "Listed books"
        );
        Ok(library)
    }

    /// Get a book by ID
    pub fn get_book(&self, id: Uuid) -> AppResult<Book> {
        tracing::debug!(%id, "Fetching book");
        Ok(self.repository.get(id)?)
    }

    /// Create a book, or overwrite the one already stored under the same ID
    pub fn create_book(&self, request: BookRequest) -> AppResult<Book> {
        validate_book(&request)?;
        let book = self.repository.create(Book::from(request))?;
        tracing::info!(id = %book.id, title = %book.title, "Book created");
        Ok(book)
    }

    /// Update title, author and publisher of an existing book
    pub fn update_book(&self, request: BookRequest) -> AppResult<Book> {
        validate_book(&request)?;
        let book = self.repository.update(Book::from(request)).map_err(|e| {
            tracing::warn!("Update rejected: {}", e);
            AppError::from(e)
        })?;
        tracing::info!(id = %book.id, title = %book.title, "Book updated");
        Ok(book)
    }

    pub fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).map_err(|e| {
            tracing::warn!("Delete rejected: {}", e);
            AppError::from(e)
        })?;
        tracing::info!(%id, "Book deleted");
        Ok(())
    }
}

/// Reject requests missing any required field, naming all of them
fn validate_book(request: &BookRequest) -> AppResult<()> {
    let mut missing = Vec::new();
    if request.id.is_nil() {
        missing.push("id");
    }
    if let Err(errors) = request.validate() {
        let fields = errors.field_errors();
        for name in ["title", "author"] {
            if fields.contains_key(name) {
                missing.push(name);
            }
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Invalid Book, the following fields are required: {}",
        missing.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockBookRepository, RepositoryError};
    use mockall::predicate::eq;

    fn request() -> BookRequest {
        BookRequest {
            id: Uuid::new_v4(),
            title: "Don Quixote".to_string(),
            author: "Miguel de Cervantes".to_string(),
            publisher: None,
        }
    }

    fn service(mock: MockBookRepository) -> CatalogService {
        CatalogService::new(Arc::new(mock))
    }

    #[test]
    fn test_create_passes_book_to_repository() {
        let req = request();
        let expected_id = req.id;

        let mut mock = MockBookRepository::new();
        mock.expect_create()
            .withf(move |b| b.id == expected_id && b.title == "Don Quixote")
            .times(1)
            .returning(Ok);

        let book = service(mock).create_book(req).unwrap();
        assert_eq!(book.id, expected_id);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        // No expectations: any repository call fails the test
        let svc = service(MockBookRepository::new());

        let err = svc.create_book(BookRequest::default()).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(
                msg,
                "Invalid Book, the following fields are required: id, title, author"
            ),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut req = request();
        req.author.clear();
        let err = svc.create_book(req).unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref msg) if msg.ends_with("required: author"))
        );
    }

    #[test]
    fn test_update_rejects_missing_title() {
        let svc = service(MockBookRepository::new());
        let mut req = request();
        req.title.clear();
        assert!(matches!(svc.update_book(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_not_found() {
        let req = request();
        let id = req.id;

        let mut mock = MockBookRepository::new();
        mock.expect_update()
            .times(1)
            .returning(move |_| Err(RepositoryError::NotFound(id)));

        assert!(matches!(
            service(mock).update_book(req),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_not_found() {
        let id = Uuid::new_v4();
        let mut mock = MockBookRepository::new();
        mock.expect_get()
            .with(eq(id))
            .times(1)
            .returning(move |_| Err(RepositoryError::NotFound(id)));

        assert!(matches!(service(mock).get_book(id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_backend_failure_is_internal() {
        let id = Uuid::new_v4();
        let mut mock = MockBookRepository::new();
        mock.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Err(RepositoryError::Backend("connection reset".to_string())));
        mock.expect_list()
            .returning(|_, _| Err(RepositoryError::Backend("connection reset".to_string())));

        let svc = service(mock);
        assert!(matches!(svc.delete_book(id), Err(AppError::Internal(_))));
        assert!(matches!(svc.list_books(10, 0), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_list_forwards_paging() {
        let mut mock = MockBookRepository::new();
        mock.expect_list()
            .with(eq(2), eq(1))
            .times(1)
            .returning(|_, page| {
                Ok(Library {
                    books: vec![],
                    page,
                    total_books: 4,
                })
            });

        let library = service(mock).list_books(2, 1).unwrap();
        assert_eq!(library.page, 1);
        assert_eq!(library.total_books, 4);
    }
}
