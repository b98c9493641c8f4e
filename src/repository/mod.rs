//! In-memory stores
//!
//! State lives only in process memory and is lost on restart. Each
//! `Repository` is an independent set of stores, so tests can run several
//! side by side.

pub mod catalog;
pub mod loans;
pub mod users;

/// Handle on all stores; cloning shares the same underlying state
#[derive(Clone)]
pub struct Repository {
    pub users: users::UsersRepository,
    pub catalog: catalog::CatalogRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new, empty set of stores
    pub fn new() -> Self {
        let catalog = catalog::CatalogRepository::new();
        Self {
            users: users::UsersRepository::new(),
            loans: loans::LoansRepository::new(catalog.clone()),
            catalog,
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
