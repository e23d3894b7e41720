//! In-memory repositories.
//!
//! Used by tests and by the server when no database is configured. State
//! lives for the life of the process.

mod entitlement_repository;
mod user_repository;

pub use entitlement_repository::InMemoryEntitlementRepository;
pub use user_repository::InMemoryUserRepository;
