//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod tokens;

use crate::{
    config::{AuthConfig, SeedConfig},
    error::{AppError, AppResult},
    models::book::NewBook,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services over the given stores
    pub fn new(repository: Repository, auth_config: &AuthConfig) -> AppResult<Self> {
        let tokens = tokens::TokenService::new(auth_config)
            .map_err(|e| AppError::Internal(format!("token settings: {}", e)))?;
        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), tokens)?,
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
        })
    }

    /// Load the startup accounts and catalog
    pub async fn seed(&self, seed: &SeedConfig) -> AppResult<()> {
        for user in &seed.users {
            self.auth.register(&user.email, &user.password, &user.name).await?;
        }

        for book in &seed.books {
            self.catalog
                .add_book(NewBook {
                    title: book.title.clone(),
                    author: book.author.clone(),
                    total_copies: book.total_copies,
                    available_copies: book.available_copies,
                })
                .await?;
        }

        tracing::info!(
            users = seed.users.len(),
            books = seed.books.len(),
            "seed data loaded"
        );
        Ok(())
    }
}
