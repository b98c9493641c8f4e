//! Loan ledger: active borrows and the borrow/return transactions
//!
//! Lock order is always book first, ledger second. Both are held across the
//! whole check-and-mutate sequence, so a copy-count change and its ledger
//! change are applied together or not at all.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::catalog::CatalogRepository;
use crate::{
    error::LoanError,
    models::{book::Book, loan::LoanRecord},
};

#[derive(Default)]
struct Ledger {
    next_id: i32,
    records: Vec<LoanRecord>,
}

impl Ledger {
    fn position(&self, user_id: i32, book_id: i32) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.user_id == user_id && r.book_id == book_id)
    }

    fn append(&mut self, user_id: i32, book: &Book, borrowed_at: DateTime<Utc>) -> LoanRecord {
        self.next_id += 1;
        let record = LoanRecord {
            id: self.next_id,
            user_id,
            book_id: book.id,
            borrowed_at,
            book_title: book.title.clone(),
        };
        self.records.push(record.clone());
        record
    }
}

#[derive(Clone)]
pub struct LoansRepository {
    catalog: CatalogRepository,
    ledger: Arc<Mutex<Ledger>>,
}

impl LoansRepository {
    pub fn new(catalog: CatalogRepository) -> Self {
        Self {
            catalog,
            ledger: Arc::new(Mutex::new(Ledger::default())),
        }
    }

    /// Borrow a book: returns the updated book
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> Result<Book, LoanError> {
        let slot = self
            .catalog
            .slot(book_id)
            .await
            .ok_or(LoanError::ItemNotFound(book_id))?;
        let mut book = slot.lock().await;

        if book.available_copies == 0 {
            return Err(LoanError::ItemUnavailable(book_id));
        }

        let mut ledger = self.ledger.lock().await;
        if ledger.position(user_id, book_id).is_some() {
            return Err(LoanError::AlreadyBorrowed { user_id, book_id });
        }

        book.decrement_availability()?;
        let record = ledger.append(user_id, &book, Utc::now());
        tracing::debug!(loan_id = record.id, user_id, book_id, "loan recorded");

        Ok(book.clone())
    }

    /// Return a borrowed book: returns the updated book
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> Result<Book, LoanError> {
        // A book missing from the catalog can never have been borrowed.
        let slot = self
            .catalog
            .slot(book_id)
            .await
            .ok_or(LoanError::LoanNotFound { user_id, book_id })?;
        let mut book = slot.lock().await;

        let mut ledger = self.ledger.lock().await;
        let position = ledger
            .position(user_id, book_id)
            .ok_or(LoanError::LoanNotFound { user_id, book_id })?;

        book.increment_availability()?;
        let record = ledger.records.remove(position);
        tracing::debug!(loan_id = record.id, user_id, book_id, "loan removed");

        Ok(book.clone())
    }

    /// Active loans for a user, in borrow order
    pub async fn list_for_user(&self, user_id: i32) -> Vec<LoanRecord> {
        let ledger = self.ledger.lock().await;
        ledger
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Count active loans across all users
    pub async fn count_active(&self) -> usize {
        self.ledger.lock().await.records.len()
    }
}
