use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

/// Errors from signup, signin and profile lookups.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User already exists")]
    EmailTaken,

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Account service failure: {0}")]
    Infrastructure(String),
}

impl AccountError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        AccountError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AccountError::Validation(_) => ErrorCode::ValidationFailed,
            AccountError::EmailTaken => ErrorCode::EmailTaken,
            AccountError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AccountError::NotFound(_) => ErrorCode::UserNotFound,
            AccountError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmailTaken => AccountError::EmailTaken,
            _ => AccountError::Infrastructure(err.to_string()),
        }
    }
}
