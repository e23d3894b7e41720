//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction and input parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at least {min} characters, got {actual}")]
    TooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' is not supported: {reason}")]
    Unsupported { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a minimum length validation error.
    pub fn too_short(field: impl Into<String>, min: usize, actual: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a well-formed value this system does not handle.
    pub fn unsupported(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Unsupported {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Unsupported { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    UserNotFound,
    EntitlementNotFound,

    // Conflict errors
    EmailTaken,
    ConcurrentModification,

    // Authorization errors
    Unauthorized,
    InvalidCredentials,

    // Entitlement errors
    TrialNotEligible,
    TrialAlreadyActive,
    TrialAlreadyUsed,
    PaymentVerificationFailed,

    // External collaborators
    GatewayError,
    MailDeliveryFailed,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::EntitlementNotFound => "ENTITLEMENT_NOT_FOUND",
            ErrorCode::EmailTaken => "EMAIL_TAKEN",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::TrialNotEligible => "TRIAL_NOT_ELIGIBLE",
            ErrorCode::TrialAlreadyActive => "TRIAL_ALREADY_ACTIVE",
            ErrorCode::TrialAlreadyUsed => "TRIAL_ALREADY_USED",
            ErrorCode::PaymentVerificationFailed => "PAYMENT_VERIFICATION_FAILED",
            ErrorCode::GatewayError => "GATEWAY_ERROR",
            ErrorCode::MailDeliveryFailed => "MAIL_DELIVERY_FAILED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// This is the error type crossing the persistence ports.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a database error, keeping the driver message for logs.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Whether a conditional write lost a race against another writer.
    pub fn is_concurrent_modification(&self) -> bool {
        self.code == ErrorCode::ConcurrentModification
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_too_short_displays_correctly() {
        let err = ValidationError::too_short("password", 6, 3);
        assert_eq!(
            format!("{}", err),
            "Field 'password' must be at least 6 characters, got 3"
        );
    }

    #[test]
    fn validation_error_exposes_field() {
        assert_eq!(ValidationError::unsupported("planType", "x").field(), "planType");
        assert_eq!(ValidationError::invalid_format("email", "x").field(), "email");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::UserNotFound, "User not found");
        assert_eq!(format!("{}", err), "[USER_NOT_FOUND] User not found");
    }

    #[test]
    fn domain_error_from_validation_keeps_field() {
        let err: DomainError = ValidationError::empty_field("email").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"email".to_string()));
    }

    #[test]
    fn concurrent_modification_is_detectable() {
        let err = DomainError::new(ErrorCode::ConcurrentModification, "stale version");
        assert!(err.is_concurrent_modification());
        assert!(!DomainError::database("boom").is_concurrent_modification());
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::TrialAlreadyUsed), "TRIAL_ALREADY_USED");
        assert_eq!(
            format!("{}", ErrorCode::PaymentVerificationFailed),
            "PAYMENT_VERIFICATION_FAILED"
        );
    }
}
