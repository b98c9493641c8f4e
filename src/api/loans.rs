//! Borrow / return endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, BOOK_NOT_FOUND_MESSAGE, LOAN_NOT_FOUND_MESSAGE},
    models::{book::BookSummary, loan::LoanRecord},
    AppState,
};

use super::AuthenticatedUser;

const MISSING_BOOK_ID: &str = "Book ID is required";

/// Borrow or return request.
///
/// `bookId` is read loosely: a JSON number or a string with a leading integer.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    book_id: Option<Value>,
}

impl BookRequest {
    /// Absent, null, empty, zero or `false`
    fn is_missing(&self) -> bool {
        match &self.book_id {
            None | Some(Value::Null) | Some(Value::Bool(false)) => true,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Catalog id named by `bookId`, if it reads as one
    fn lookup_id(&self) -> Option<i32> {
        match self.book_id.as_ref()? {
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).ok(),
                None => n
                    .as_f64()
                    .map(f64::trunc)
                    .filter(|f| f.is_finite() && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                    .map(|f| f as i32),
            },
            Value::String(s) => leading_int(s),
            _ => None,
        }
    }
}

/// Integer prefix of `s` after leading whitespace: `"2abc"` reads as 2, `"abc"` as nothing
fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    i32::try_from(if negative { -value } else { value }).ok()
}

/// Body of a borrow or return call; an unreadable body counts as an empty one
fn book_request(payload: Result<Json<BookRequest>, JsonRejection>) -> BookRequest {
    payload.map(|Json(body)| body).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        BookRequest::default()
    })
}

/// Borrow / return response
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub success: bool,
    pub message: String,
    pub book: BookSummary,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyBooksResponse {
    pub borrowed_books: Vec<LoanRecord>,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 400, description = "Missing book ID, no copy available or already borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> AppResult<Json<LoanResponse>> {
    let request = book_request(payload);
    if request.is_missing() {
        return Err(AppError::Validation(MISSING_BOOK_ID.to_string()));
    }
    let Some(book_id) = request.lookup_id() else {
        tracing::info!(user_id = claims.user_id, "borrow refused: bookId names no book");
        return Err(AppError::NotFound(BOOK_NOT_FOUND_MESSAGE.to_string()));
    };

    let book = state.services.loans.borrow(claims.user_id, book_id).await?;

    Ok(Json(LoanResponse {
        success: true,
        message: "Book borrowed successfully!".to_string(),
        book: book.into(),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 404, description = "No active loan for this book", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> AppResult<Json<LoanResponse>> {
    let Some(book_id) = book_request(payload).lookup_id() else {
        tracing::info!(user_id = claims.user_id, "return refused: bookId names no book");
        return Err(AppError::NotFound(LOAN_NOT_FOUND_MESSAGE.to_string()));
    };

    let book = state
        .services
        .loans
        .return_book(claims.user_id, book_id)
        .await?;

    Ok(Json(LoanResponse {
        success: true,
        message: "Book returned successfully!".to_string(),
        book: book.into(),
    }))
}

/// Active loans of the caller
#[utoipa::path(
    get,
    path = "/my-books",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's active loans", body = MyBooksResponse),
        (status = 401, description = "Missing bearer token", body = crate::error::ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MyBooksResponse>> {
    let borrowed_books = state.services.loans.user_loans(claims.user_id).await;
    Ok(Json(MyBooksResponse { borrowed_books }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> BookRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn missing_book_ids() {
        for body in [r#"{}"#, r#"{"bookId": null}"#, r#"{"bookId": ""}"#, r#"{"bookId": 0}"#, r#"{"bookId": false}"#] {
            assert!(request(body).is_missing(), "{}", body);
        }
        assert!(!request(r#"{"bookId": "0"}"#).is_missing());
        assert!(!request(r#"{"bookId": "abc"}"#).is_missing());
    }

    #[test]
    fn numbers_and_numeric_strings_name_a_book() {
        assert_eq!(request(r#"{"bookId": 3}"#).lookup_id(), Some(3));
        assert_eq!(request(r#"{"bookId": 5.0}"#).lookup_id(), Some(5));
        assert_eq!(request(r#"{"bookId": 5.9}"#).lookup_id(), Some(5));
        assert_eq!(request(r#"{"bookId": "5"}"#).lookup_id(), Some(5));
        assert_eq!(request(r#"{"bookId": " 2abc"}"#).lookup_id(), Some(2));
        assert_eq!(request(r#"{"bookId": "0x3"}"#).lookup_id(), Some(3));
    }

    #[test]
    fn unreadable_book_ids_name_nothing() {
        for body in [
            r#"{}"#,
            r#"{"bookId": "abc"}"#,
            r#"{"bookId": "-"}"#,
            r#"{"bookId": true}"#,
            r#"{"bookId": {"id": 1}}"#,
            r#"{"bookId": 99999999999}"#,
        ] {
            assert_eq!(request(body).lookup_id(), None, "{}", body);
        }
    }

    #[test]
    fn unreadable_body_counts_as_empty() {
        assert!(BookRequest::default().is_missing());
        assert_eq!(BookRequest::default().lookup_id(), None);
    }
}
