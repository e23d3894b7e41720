//! Entitlement error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | Trial | 400 |
//! | PaymentVerificationFailed | 400 |
//! | NotFound | 404 |
//! | Gateway | 503 |
//! | Persistence | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

/// Why a user cannot start a trial at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialIneligibility {
    /// Account is not on the free plan.
    Plan,
    /// Account holds a paid plan.
    Paid,
}

impl TrialIneligibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialIneligibility::Plan => "plan",
            TrialIneligibility::Paid => "paid",
        }
    }
}

/// Rejections from `start_trial`, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error("Trial is only available on the free plan")]
    NotEligible(TrialIneligibility),

    #[error("Trial is already active")]
    AlreadyActive,

    #[error("Trial has already been used")]
    AlreadyUsed,
}

impl TrialError {
    /// Short machine-readable reason reported to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            TrialError::NotEligible(why) => why.as_str(),
            TrialError::AlreadyActive => "active",
            TrialError::AlreadyUsed => "used",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TrialError::NotEligible(_) => ErrorCode::TrialNotEligible,
            TrialError::AlreadyActive => ErrorCode::TrialAlreadyActive,
            TrialError::AlreadyUsed => ErrorCode::TrialAlreadyUsed,
        }
    }
}

/// Errors surfaced by entitlement operations.
#[derive(Debug, Clone, Error)]
pub enum EntitlementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Trial(#[from] TrialError),

    /// The gateway callback did not prove payment for this user's order.
    #[error("Payment verification failed")]
    PaymentVerificationFailed,

    #[error("Payment gateway unavailable: {0}")]
    Gateway(String),

    #[error("No account found for user {0}")]
    NotFound(UserId),

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl EntitlementError {
    pub fn gateway(message: impl Into<String>) -> Self {
        EntitlementError::Gateway(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        EntitlementError::Persistence(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::Validation(_) => ErrorCode::ValidationFailed,
            EntitlementError::Trial(err) => err.code(),
            EntitlementError::PaymentVerificationFailed => ErrorCode::PaymentVerificationFailed,
            EntitlementError::Gateway(_) => ErrorCode::GatewayError,
            EntitlementError::NotFound(_) => ErrorCode::UserNotFound,
            EntitlementError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                let field = err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                EntitlementError::Validation(ValidationError::invalid_format(field, err.message))
            }
            _ => EntitlementError::Persistence(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_reasons_are_stable() {
        assert_eq!(TrialError::NotEligible(TrialIneligibility::Plan).reason(), "plan");
        assert_eq!(TrialError::NotEligible(TrialIneligibility::Paid).reason(), "paid");
        assert_eq!(TrialError::AlreadyActive.reason(), "active");
        assert_eq!(TrialError::AlreadyUsed.reason(), "used");
    }

    #[test]
    fn trial_errors_map_to_distinct_codes() {
        assert_eq!(
            EntitlementError::from(TrialError::AlreadyUsed).code(),
            ErrorCode::TrialAlreadyUsed
        );
        assert_eq!(
            EntitlementError::from(TrialError::AlreadyActive).code(),
            ErrorCode::TrialAlreadyActive
        );
    }

    #[test]
    fn database_errors_become_persistence() {
        let err: EntitlementError = DomainError::database("connection reset").into();
        assert!(matches!(err, EntitlementError::Persistence(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn domain_validation_errors_stay_validation() {
        let err: EntitlementError = DomainError::validation("planType", "bad").into();
        assert!(matches!(err, EntitlementError::Validation(_)));
    }
}
