//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - accounts, unique on email
//! - `PostgresEntitlementRepository` - one row per user, version-checked updates

mod entitlement_repository;
mod user_repository;

pub use entitlement_repository::PostgresEntitlementRepository;
pub use user_repository::PostgresUserRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

fn database_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn is_unique_violation(e: &sqlx::Error, constraint: &str) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.constraint() == Some(constraint))
}
