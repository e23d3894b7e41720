//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, time, and error types that form the vocabulary
//! of the account and entitlement domains.

mod auth;
mod clock;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
