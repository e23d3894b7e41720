//! Axum router configuration for `/api/auth`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{check_access, get_profile, signin, signup, start_trial, trial_status};

/// # Routes
///
/// ## Public
/// - `POST /signup`
/// - `POST /signin`
///
/// ## Authenticated
/// - `GET /get` - profile plus access
/// - `POST /start-trial`
/// - `GET /check-gpt-access`
/// - `GET /trial-status`
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/get", get(get_profile))
        .route("/start-trial", post(start_trial))
        .route("/check-gpt-access", get(check_access))
        .route("/trial-status", get(trial_status))
}
