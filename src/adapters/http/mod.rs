//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers and routes; `router`
//! assembles them behind the auth middleware.

pub mod account;
pub mod contact;
pub mod error;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod payment;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use extract::ApiJson;
pub use router::{app_router, RouterOptions};
pub use state::AppState;
