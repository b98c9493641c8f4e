//! Configuration management for the lending server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Placeholder signing secret; startup warns while it is in use.
pub const DEFAULT_JWT_SECRET: &str = "change-this-secret-in-production";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Account created at startup
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Catalog entry created at startup
#[derive(Debug, Deserialize, Clone)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

/// Initial in-memory content; everything is lost on restart.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix PUSTAK_ (PUSTAK_SERVER__PORT=9000)
            .add_source(
                Environment::with_prefix("PUSTAK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.auth.token_ttl()?;
        Ok(config)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl AuthConfig {
    /// Session token lifetime; rejects values chrono cannot represent
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        i64::try_from(self.jwt_expiration_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "auth.jwt_expiration_hours is out of range: {}",
                    self.jwt_expiration_hours
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        let book = |title: &str, author: &str, available_copies, total_copies| SeedBook {
            title: title.to_string(),
            author: author.to_string(),
            total_copies,
            available_copies,
        };

        Self {
            users: vec![SeedUser {
                email: "swi@gmail.com".to_string(),
                password: "password".to_string(),
                name: "Test User".to_string(),
            }],
            books: vec![
                book("The Great Gatsby", "F. Scott Fitzgerald", 3, 5),
                book("To Kill a Mockingbird", "Harper Lee", 2, 4),
                book("1984", "George Orwell", 0, 2),
                book("Pride and Prejudice", "Jane Austen", 1, 3),
                book("The Hobbit", "J.R.R. Tolkien", 4, 6),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.jwt_expiration_hours, 24);
        assert!(config.uses_default_secret());
        assert_eq!(config.seed.users.len(), 1);
        assert_eq!(config.seed.books.len(), 5);
        assert_eq!(config.seed.books[2].title, "1984");
        assert_eq!(config.seed.books[2].available_copies, 0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[server]\nhost = \"127.0.0.1\"\nport = 9100\n\n[seed]\nbooks = []\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.auth.jwt_expiration_hours, 24);
        assert!(config.seed.books.is_empty());
        assert!(config.seed.users.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[server]\nport = 9100\n\n[auth]\njwt_secret = \"s3cret\"\n\n[logging]\nformat = \"json\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.jwt_expiration_hours, 24);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn token_ttl_rejects_unrepresentable_lifetimes() {
        let auth = AuthConfig::default();
        assert_eq!(auth.token_ttl().unwrap(), chrono::Duration::hours(24));

        let auth = AuthConfig {
            jwt_expiration_hours: u64::MAX,
            ..AuthConfig::default()
        };
        assert!(matches!(auth.token_ttl(), Err(ConfigError::Message(_))));

        let auth = AuthConfig {
            jwt_expiration_hours: i64::MAX as u64,
            ..AuthConfig::default()
        };
        assert!(auth.token_ttl().is_err());
    }
}
