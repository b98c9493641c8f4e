//! Pustak Point lending service
//!
//! Authenticated users borrow and return books whose availability is
//! tracked as a finite number of copies. All state is held in memory.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build fresh stores from `config` and load its seed data
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let services = services::Services::new(repository::Repository::new(), &config.auth)?;
        services.seed(&config.seed).await?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
