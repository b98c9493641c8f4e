//! Catalog store: books and their copy counts
//!
//! Every book sits behind its own mutex. That mutex is the per-item critical
//! section the loan ledger holds while it checks and changes copy counts.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{CatalogError, LoanError},
    models::book::{Book, NewBook},
};

pub(super) type BookSlot = Arc<Mutex<Book>>;

#[derive(Default)]
struct CatalogTable {
    next_id: i32,
    books: IndexMap<i32, BookSlot>,
}

#[derive(Clone, Default)]
pub struct CatalogRepository {
    table: Arc<RwLock<CatalogTable>>,
}

impl CatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// List all books in insertion order
    pub async fn list(&self) -> Vec<Book> {
        let slots: Vec<BookSlot> = self.table.read().await.books.values().cloned().collect();

        let mut books = Vec::with_capacity(slots.len());
        for slot in slots {
            books.push(slot.lock().await.clone());
        }
        books
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> Option<Book> {
        let slot = self.slot(id).await?;
        let book = slot.lock().await;
        Some(book.clone())
    }

    /// Add a book to the catalog
    pub async fn insert(&self, new_book: NewBook) -> Result<Book, CatalogError> {
        if new_book.available_copies > new_book.total_copies {
            return Err(CatalogError::InvalidCopyCounts {
                available: new_book.available_copies,
                total: new_book.total_copies,
            });
        }

        let mut table = self.table.write().await;
        table.next_id += 1;
        let book = Book {
            id: table.next_id,
            title: new_book.title,
            author: new_book.author,
            available_copies: new_book.available_copies,
            total_copies: new_book.total_copies,
        };
        table.books.insert(book.id, Arc::new(Mutex::new(book.clone())));

        Ok(book)
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.books.len()
    }

    /// Handle on a book's critical section, for the loan ledger only
    pub(super) async fn slot(&self, id: i32) -> Option<BookSlot> {
        self.table.read().await.books.get(&id).cloned()
    }
}

// Copy-count mutators. Callers must hold the book's mutex and apply the
// matching ledger change before releasing it.
impl Book {
    pub(super) fn decrement_availability(&mut self) -> Result<(), LoanError> {
        self.available_copies = self
            .available_copies
            .checked_sub(1)
            .ok_or(LoanError::ItemUnavailable(self.id))?;
        Ok(())
    }

    pub(super) fn increment_availability(&mut self) -> Result<(), LoanError> {
        if self.available_copies >= self.total_copies {
            return Err(LoanError::Inconsistent {
                book_id: self.id,
                detail: format!(
                    "return would raise available copies above total ({}/{})",
                    self.available_copies, self.total_copies
                ),
            });
        }
        self.available_copies += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, available: u32, total: u32) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            total_copies: total,
            available_copies: available,
        }
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let catalog = CatalogRepository::new();
        for title in ["Gatsby", "Mockingbird", "1984"] {
            catalog.insert(new_book(title, 1, 1)).await.unwrap();
        }

        let titles: Vec<String> = catalog.list().await.into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Gatsby", "Mockingbird", "1984"]);
        assert_eq!(catalog.count().await, 3);
    }

    #[tokio::test]
    async fn get_by_id_reports_missing_books() {
        let catalog = CatalogRepository::new();
        let book = catalog.insert(new_book("1984", 0, 2)).await.unwrap();

        assert_eq!(catalog.get_by_id(book.id).await, Some(book));
        assert_eq!(catalog.get_by_id(42).await, None);
    }

    #[tokio::test]
    async fn insert_rejects_more_available_than_total() {
        let catalog = CatalogRepository::new();
        let err = catalog.insert(new_book("Broken", 3, 2)).await.unwrap_err();
        assert_eq!(err, CatalogError::InvalidCopyCounts { available: 3, total: 2 });
        assert_eq!(catalog.count().await, 0);
    }

    #[test]
    fn decrement_stops_at_zero() {
        let mut book = Book {
            id: 3,
            title: "1984".into(),
            author: "George Orwell".into(),
            available_copies: 0,
            total_copies: 2,
        };
        assert_eq!(book.decrement_availability(), Err(LoanError::ItemUnavailable(3)));
        assert_eq!(book.available_copies, 0);
    }

    #[test]
    fn increment_refuses_to_exceed_total() {
        let mut book = Book {
            id: 1,
            title: "Gatsby".into(),
            author: "F. Scott Fitzgerald".into(),
            available_copies: 4,
            total_copies: 5,
        };
        book.increment_availability().unwrap();
        assert_eq!(book.available_copies, 5);

        let err = book.increment_availability().unwrap_err();
        assert!(matches!(err, LoanError::Inconsistent { book_id: 1, .. }));
        assert_eq!(book.available_copies, 5);
    }
}
