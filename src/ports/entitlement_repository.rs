//! Entitlement repository port.
//!
//! Stores one [`EntitlementRecord`] per user with optimistic concurrency:
//! every update is a compare-and-swap on `version`.
//!
//! # Example
//!
//! ```ignore
//! let current = repo.find_by_user(&user_id).await?.ok_or(...)?;
//! let next = EntitlementEngine::start_trial(&current, clock.now())?;
//! match repo.update(&next).await {
//!     Ok(saved) => saved,
//!     Err(e) if e.is_concurrent_modification() => { /* re-read and retry */ }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use async_trait::async_trait;

use crate::domain::entitlement::EntitlementRecord;
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for entitlement records.
#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    /// Find the record owned by `user_id`.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<EntitlementRecord>, DomainError>;

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if a record for the user already exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, record: &EntitlementRecord) -> Result<(), DomainError>;

    /// Replace the stored record if its version still equals `record.version`.
    ///
    /// Returns the stored record, whose version is one higher.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored version differs
    /// - `EntitlementNotFound` if there is no record for the user
    /// - `DatabaseError` on persistence failure
    async fn update(&self, record: &EntitlementRecord) -> Result<EntitlementRecord, DomainError>;
}
