//! API error responses.
//!
//! Every handler error funnels through [`ApiError`], which picks the status
//! code and renders `{ "errorCode", "message", "reason"? }`.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Malformed JSON body, Validation, Trial, PaymentVerificationFailed, EmailTaken, InvalidCredentials | 400 |
//! | Auth | 401 (503 when the validator is down) |
//! | NotFound | 404 |
//! | Mail delivery | 502 |
//! | Gateway | 503 |
//! | Persistence / infrastructure | 500 |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::handlers::contact::ContactError;
use crate::domain::account::AccountError;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{AuthError, ErrorCode};

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    /// Machine-readable sub-reason (trial errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug)]
pub enum ApiError {
    Account(AccountError),
    Entitlement(EntitlementError),
    Contact(ContactError),
    Auth(AuthError),
    /// Request body was missing, not JSON, or the wrong shape.
    Body(JsonRejection),
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self::Account(err)
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        Self::Entitlement(err)
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        Self::Contact(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

fn internal(code: ErrorCode, detail: &str) -> (StatusCode, ErrorResponse) {
    tracing::error!(error = %detail, code = %code, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(code, "Server error"),
    )
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Account(err) => match err {
                AccountError::Validation(_)
                | AccountError::EmailTaken
                | AccountError::InvalidCredentials => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(err.code(), err.to_string()),
                ),
                AccountError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(err.code(), "User not found"),
                ),
                AccountError::Infrastructure(detail) => internal(err.code(), detail),
            },
            ApiError::Entitlement(err) => match err {
                EntitlementError::Validation(_) | EntitlementError::PaymentVerificationFailed => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(err.code(), err.to_string()),
                ),
                EntitlementError::Trial(trial) => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(err.code(), trial.to_string()).with_reason(trial.reason()),
                ),
                EntitlementError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(err.code(), "User not found"),
                ),
                EntitlementError::Gateway(detail) => {
                    tracing::warn!(error = %detail, "payment gateway unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorResponse::new(err.code(), "Payment gateway unavailable"),
                    )
                }
                EntitlementError::Persistence(detail) => internal(err.code(), detail),
            },
            ApiError::Contact(err) => match err {
                ContactError::Validation(v) => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::ValidationFailed, v.to_string()),
                ),
                ContactError::Delivery(_) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(ErrorCode::MailDeliveryFailed, err.to_string()),
                ),
            },
            ApiError::Auth(err) => match err {
                AuthError::ServiceUnavailable(detail) => {
                    tracing::error!(error = %detail, "auth service unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorResponse::new(ErrorCode::Unauthorized, "Authentication service unavailable"),
                    )
                }
                _ => (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(ErrorCode::Unauthorized, err.to_string()),
                ),
            },
            ApiError::Body(rejection) => {
                tracing::debug!(status = %rejection.status(), "request body rejected");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::ValidationFailed, rejection.body_text()),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}
