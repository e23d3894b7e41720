//! Top-level router assembly.

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::account::account_routes;
use super::contact::contact_routes;
use super::health::health_routes;
use super::middleware::auth::{auth_middleware, LEGACY_TOKEN_HEADER};
use super::payment::payment_routes;
use super::state::AppState;

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(LEGACY_TOKEN_HEADER),
        ])
}

/// Builds the full application router.
///
/// ```text
/// /                       banner
/// /health                 liveness
/// /api/auth/*             accounts, trial, access
/// /api/payment/*          orders, verification, status
/// /api/contact/send       contact form
/// ```
///
/// The session middleware wraps every `/api` route but never rejects; only
/// handlers taking `RequireAuth` turn a missing or bad token into 401.
pub fn app_router(state: AppState, options: RouterOptions) -> Router {
    let api = Router::new()
        .nest("/auth", account_routes())
        .nest("/payment", payment_routes())
        .nest("/contact", contact_routes())
        .layer(middleware::from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health_routes())
        .nest("/api", api)
        .with_state(state)
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}
