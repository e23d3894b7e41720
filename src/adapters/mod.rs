//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Argon2 password hashing, JWT sessions
//! - `email` - Resend contact mailer
//! - `http` - axum REST API
//! - `memory` - in-process repositories for tests and local runs
//! - `postgres` - sqlx repositories
//! - `razorpay` - payment order creation

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;
