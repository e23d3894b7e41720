//! Authentication middleware and extractors for axum.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser (or RejectedSession)
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Tokens are read from `Authorization: Bearer <token>` or, for older
//! clients, the bare `x-auth-token` header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Legacy token header.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Pulls the session token from the request headers, preferring `Authorization`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get(LEGACY_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Why a presented session token was not accepted.
///
/// Stored in request extensions so that [`RequireAuth`] can report the
/// real cause on protected routes while public routes ignore it.
#[derive(Debug, Clone)]
pub struct RejectedSession(pub AuthError);

/// Validates the session token, if any, and injects the user.
///
/// Never rejects on its own. A missing or bad token leaves the request
/// unauthenticated, so signup, signin and contact keep working for clients
/// holding a stale token; protected handlers reject via [`RequireAuth`].
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(request.headers()).map(str::to_owned) {
        match validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, path = %request.uri().path(), "session token rejected");
                request.extensions_mut().insert(RejectedSession(e));
            }
        }
    }

    next.run(request).await
}

/// Extractor that requires authentication.
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
                return Ok(RequireAuth(user.clone()));
            }
            match parts.extensions.get::<RejectedSession>() {
                Some(RejectedSession(e)) => Err(AuthRejection::Rejected(e.clone())),
                None => Err(AuthRejection::Unauthenticated),
            }
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No token was presented.
    Unauthenticated,
    /// A token was presented but did not validate.
    Rejected(AuthError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => ApiError::Auth(AuthError::MissingToken).into_response(),
            AuthRejection::Rejected(e) => ApiError::Auth(e).into_response(),
        }
    }
}
