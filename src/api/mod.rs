//! Request gateway: routes, bearer authentication and error shaping

pub mod auth;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use std::any::Any;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    models::user::SessionClaims,
    AppState,
};

/// Extractor for the caller's verified session claims.
///
/// Missing bearer token is 401, a token that fails verification is 403.
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    tracing::debug!(missing = rejection.is_missing(), "no bearer token");
                    AppError::Authentication("Access token required".to_string())
                })?;

        let claims = state
            .services
            .auth
            .authenticate(bearer.token())
            .map_err(|e| {
                tracing::warn!(reason = %e, "bearer token rejected");
                AppError::from(e)
            })?;

        tracing::debug!(
            user_id = claims.user_id,
            expires_at = ?claims.expires_at(),
            "bearer token accepted"
        );
        Ok(AuthenticatedUser(claims))
    }
}

/// Unwrap a JSON body, turning any rejection into a 400 with `message`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>, message: &str) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        AppError::Validation(message.to_string())
    })
}

async fn endpoint_not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let routes = Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        // Protected
        .route("/books", get(books::list_books))
        .route("/borrow", post(loans::borrow_book))
        .route("/return", post(loans::return_book))
        .route("/my-books", get(loans::my_books))
        .fallback(endpoint_not_found)
        .with_state(state);

    routes
        .merge(openapi::create_openapi_router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
