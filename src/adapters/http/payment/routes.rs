//! Axum router configuration for `/api/payment`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{create_order, subscription_status, verify_payment};

/// All routes require authentication.
///
/// - `POST /create-order`
/// - `POST /verify-payment`
/// - `GET /subscription-status`
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify-payment", post(verify_payment))
        .route("/subscription-status", get(subscription_status))
}
