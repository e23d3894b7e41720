//! Payment endpoints under `/api/payment`.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::payment_routes;
