//! Catalog item (book) model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry with its copy counts.
///
/// `0 <= available_copies <= total_copies` holds at all times; only the loan
/// ledger changes `available_copies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub available_copies: u32,
    pub total_copies: u32,
}

/// Short book representation returned by borrow/return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub available_copies: u32,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            available_copies: book.available_copies,
        }
    }
}

/// Data needed to add a book to the catalog
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    pub available_copies: u32,
}
