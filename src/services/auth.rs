//! Authentication service: password hashing, registration and login

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::{
    error::{CredentialError, TokenError},
    models::user::{PublicUser, SessionClaims, UserAccount},
    repository::Repository,
};

use super::tokens::TokenService;

/// Hash a password with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// Check a password against a stored hash.
///
/// The digest comparison inside argon2 is constant-time.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| CredentialError::CorruptHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    tokens: TokenService,
    /// Verified against when the email is unknown, so both failure paths cost the same
    decoy_hash: String,
}

impl AuthService {
    pub fn new(repository: Repository, tokens: TokenService) -> Result<Self, CredentialError> {
        let decoy_hash = hash_password("decoy-password-never-matches")?;
        Ok(Self {
            repository,
            tokens,
            decoy_hash,
        })
    }

    /// Register a new account
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserAccount, CredentialError> {
        let hash = hash_password(password)?;
        let account = self.repository.users.insert(email, hash, name).await?;
        tracing::info!(user_id = account.id, "account registered");
        Ok(account)
    }

    /// Authenticate by email and password and mint a session token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, CredentialError> {
        let account = self.repository.users.find_by_email(email).await;

        let (account, password_ok) = match account {
            Some(account) => {
                let ok = verify_password(password, &account.password_hash)?;
                (Some(account), ok)
            }
            None => {
                verify_password(password, &self.decoy_hash)?;
                (None, false)
            }
        };

        let account = match (account, password_ok) {
            (Some(account), true) => account,
            (account, _) => {
                tracing::warn!(
                    known_email = account.is_some(),
                    "login rejected: invalid credentials"
                );
                return Err(CredentialError::InvalidCredentials);
            }
        };

        let user = PublicUser::from(&account);
        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginOutcome { token, user })
    }

    /// Verify a bearer token
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.tokens.verify(token)
    }
}
