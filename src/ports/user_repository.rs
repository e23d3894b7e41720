//! User account repository port.

use async_trait::async_trait;

use crate::domain::account::{EmailAddress, UserAccount};
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for registered accounts.
///
/// Implementations must enforce email uniqueness atomically.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if another account uses the same normalized email
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError>;

    /// Find an account by normalized email.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserAccount>, DomainError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;
}
