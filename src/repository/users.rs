//! Credential store: in-memory user accounts

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{error::CredentialError, models::user::UserAccount};

#[derive(Default)]
struct UsersTable {
    next_id: i32,
    accounts: Vec<UserAccount>,
}

#[derive(Clone, Default)]
pub struct UsersRepository {
    table: Arc<RwLock<UsersTable>>,
}

impl UsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an account by email.
    ///
    /// Exact, case-sensitive match; clients are expected to normalize.
    pub async fn find_by_email(&self, email: &str) -> Option<UserAccount> {
        let table = self.table.read().await;
        table.accounts.iter().find(|a| a.email == email).cloned()
    }

    /// Register a new account with an already hashed password.
    ///
    /// Email uniqueness is case-insensitive even though lookup is not.
    pub async fn insert(
        &self,
        email: &str,
        password_hash: String,
        name: &str,
    ) -> Result<UserAccount, CredentialError> {
        let mut table = self.table.write().await;

        if table
            .accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
        {
            return Err(CredentialError::DuplicateEmail(email.to_string()));
        }

        table.next_id += 1;
        let account = UserAccount {
            id: table.next_id,
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        table.accounts.push(account.clone());

        Ok(account)
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let users = UsersRepository::new();
        let a = users.insert("a@example.com", "h1".into(), "A").await.unwrap();
        let b = users.insert("b@example.com", "h2".into(), "B").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(users.count().await, 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let users = UsersRepository::new();
        users.insert("reader@example.com", "h".into(), "Reader").await.unwrap();

        let err = users
            .insert("Reader@Example.com", "h".into(), "Other")
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::DuplicateEmail(_)));
        assert_eq!(users.count().await, 1);
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let users = UsersRepository::new();
        let account = users.insert("reader@example.com", "h".into(), "Reader").await.unwrap();

        assert_eq!(users.find_by_email("reader@example.com").await.unwrap().id, account.id);
        assert!(users.find_by_email("READER@example.com").await.is_none());
        assert!(users.find_by_email("nobody@example.com").await.is_none());
    }
}
