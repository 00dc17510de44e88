//! In-memory book storage

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::models::{Book, Library};

/// Books in insertion order plus an id -> position index.
///
/// Both live behind the same lock so no reader ever sees them disagree.
#[derive(Debug, Default)]
struct Shelf {
    books: Vec<Book>,
    index: HashMap<Uuid, usize>,
}

impl Shelf {
    fn position(&self, id: Uuid) -> RepositoryResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(RepositoryError::NotFound(id))
    }

    /// Overwrite the descriptive fields of the book at `pos`.
    fn revise(&mut self, pos: usize, changes: Book) -> Book {
        let stored = &mut self.books[pos];
        stored.title = changes.title;
        stored.author = changes.author;
        stored.publisher = changes.publisher;
        // Never move backwards, even if the wall clock does
        stored.last_modified_date = Utc::now().max(stored.last_modified_date);
        stored.clone()
    }
}

/// Thread-safe in-memory book repository.
///
/// Reads share the lock; `create`, `update` and `delete` hold it exclusively
/// for the whole lookup-and-mutate sequence. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookRepository for InMemoryBookRepository {
    fn create(&self, mut book: Book) -> RepositoryResult<Book> {
        let mut shelf = self.shelf.write();

        if let Some(&pos) = shelf.index.get(&book.id) {
            return Ok(shelf.revise(pos, book));
        }

        let now = Utc::now();
        book.created_date = now;
        book.last_modified_date = now;

        let pos = shelf.books.len();
        shelf.index.insert(book.id, pos);
        shelf.books.push(book.clone());
        Ok(book)
    }

    fn get(&self, id: Uuid) -> RepositoryResult<Book> {
        let shelf = self.shelf.read();
        let pos = shelf.position(id)?;
        Ok(shelf.books[pos].clone())
    }

    fn list(&self, page_size: usize, page_index: usize) -> RepositoryResult<Library> {
        let shelf = self.shelf.read();
        let total = shelf.books.len();
        let start = page_size.saturating_mul(page_index).min(total);
        let end = start.saturating_add(page_size).min(total);

        Ok(Library {
            books: shelf.books[start..end].to_vec(),
            page: page_index,
            total_books: total,
        })
    }

    fn update(&self, book: Book) -> RepositoryResult<Book> {
        let mut shelf = self.shelf.write();
        let pos = shelf.position(book.id)?;
        Ok(shelf.revise(pos, book))
    }

    fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut shelf = self.shelf.write();
        let pos = shelf.position(id)?;

        shelf.books.remove(pos);
        shelf.index.remove(&id);
        for p in shelf.index.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Ok(())
    }
}
