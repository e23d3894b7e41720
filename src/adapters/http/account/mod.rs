//! Account and entitlement endpoints under `/api/auth`.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::account_routes;
