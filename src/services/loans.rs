//! Loan management service

use crate::{
    error::LoanError,
    models::{book::Book, loan::LoanRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a user
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> Result<Book, LoanError> {
        match self.repository.loans.borrow(user_id, book_id).await {
            Ok(book) => {
                tracing::info!(user_id, book_id, available = book.available_copies, "book borrowed");
                Ok(book)
            }
            Err(e) => {
                log_refusal("borrow", &e);
                Err(e)
            }
        }
    }

    /// Return a borrowed book
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> Result<Book, LoanError> {
        match self.repository.loans.return_book(user_id, book_id).await {
            Ok(book) => {
                tracing::info!(user_id, book_id, available = book.available_copies, "book returned");
                Ok(book)
            }
            Err(e) => {
                log_refusal("return", &e);
                Err(e)
            }
        }
    }

    /// Active loans of a user
    pub async fn user_loans(&self, user_id: i32) -> Vec<LoanRecord> {
        self.repository.loans.list_for_user(user_id).await
    }
}

fn log_refusal(operation: &str, err: &LoanError) {
    match err {
        LoanError::Inconsistent { .. } => tracing::error!(operation, error = %err, "ledger desync"),
        _ => tracing::info!(operation, reason = %err, "loan request refused"),
    }
}
