//! Catalog service

use crate::{
    error::CatalogError,
    models::book::{Book, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books, in catalog order
    pub async fn list_books(&self) -> Vec<Book> {
        self.repository.catalog.list().await
    }

    pub async fn add_book(&self, book: NewBook) -> Result<Book, CatalogError> {
        self.repository.catalog.insert(book).await
    }
}
