//! HTTP middleware for axum.
//!
//! - `auth` - Session token middleware and the `RequireAuth` extractor

pub mod auth;

pub use auth::{auth_middleware, extract_token, AuthRejection, AuthState, RejectedSession, RequireAuth};
