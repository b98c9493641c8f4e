//! Error types for the lending service
//!
//! Each store and service returns its own error enum. `AppError` is the
//! gateway-level error: the `From` impls below are the only place where a
//! component error is turned into an HTTP status and a client message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every internal failure; details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

pub const BOOK_NOT_FOUND_MESSAGE: &str = "Book not found";
pub const LOAN_NOT_FOUND_MESSAGE: &str = "Book not found in your borrowed list";

/// Credential store and login failures
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Unknown email and wrong password are deliberately the same variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("stored password hash is unreadable: {0}")]
    CorruptHash(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Session token failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Catalog store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid copy counts: {available} available out of {total}")]
    InvalidCopyCounts { available: u32, total: u32 },
}

/// Loan ledger failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("book {0} not found")]
    ItemNotFound(i32),

    #[error("book {0} has no copies available")]
    ItemUnavailable(i32),

    #[error("user {user_id} already borrowed book {book_id}")]
    AlreadyBorrowed { user_id: i32, book_id: i32 },

    #[error("user {user_id} has no active loan for book {book_id}")]
    LoanNotFound { user_id: i32, book_id: i32 },

    /// Ledger and catalog disagree; never clamped, always surfaced.
    #[error("ledger/catalog desync on book {book_id}: {detail}")]
    Inconsistent { book_id: i32, detail: String },
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing credentials or bearer token (401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Presented token rejected (403)
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Request conflicts with current lending state (reported as 400)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(detail) => AppError::Internal(format!("token signing: {}", detail)),
            TokenError::Expired | TokenError::Malformed | TokenError::BadSignature => {
                AppError::Authorization("Invalid or expired token".to_string())
            }
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => {
                AppError::Authentication("invalid credentials".to_string())
            }
            CredentialError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Email already registered: {}", email))
            }
            CredentialError::CorruptHash(detail) | CredentialError::Hashing(detail) => {
                AppError::Internal(detail)
            }
            CredentialError::Token(token) => token.into(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::ItemNotFound(_) => AppError::NotFound(BOOK_NOT_FOUND_MESSAGE.to_string()),
            LoanError::ItemUnavailable(_) => {
                AppError::Conflict("Book is not available for borrowing".to_string())
            }
            LoanError::AlreadyBorrowed { .. } => {
                AppError::Conflict("You have already borrowed this book".to_string())
            }
            LoanError::LoanNotFound { .. } => {
                AppError::NotFound(LOAN_NOT_FOUND_MESSAGE.to_string())
            }
            inconsistent @ LoanError::Inconsistent { .. } => {
                AppError::Internal(inconsistent.to_string())
            }
        }
    }
}

/// Result type alias for gateway operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_reported_as_bad_request() {
        let response = AppError::from(LoanError::AlreadyBorrowed { user_id: 7, book_id: 5 }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(LoanError::ItemUnavailable(3)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn token_failures_are_forbidden_but_signing_is_internal() {
        for err in [TokenError::Expired, TokenError::Malformed, TokenError::BadSignature] {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        let response = AppError::from(TokenError::Signing("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn desync_is_internal_and_hides_detail() {
        let err = LoanError::Inconsistent { book_id: 1, detail: "over capacity".into() };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({ "message": INTERNAL_ERROR_MESSAGE }));
    }

    #[test]
    fn invalid_credentials_share_one_message() {
        match AppError::from(CredentialError::InvalidCredentials) {
            AppError::Authentication(msg) => assert_eq!(msg, "invalid credentials"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
