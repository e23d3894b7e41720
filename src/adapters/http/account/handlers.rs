//! HTTP handlers for account and entitlement endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::SecretString;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::ApiJson;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::account::{RegisterUserCommand, SignInCommand};

use super::dto::{
    AccessResponse, ProfileResponse, SigninRequest, SigninResponse, SignupRequest, SignupResponse,
    StartTrialResponse,
};

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .register_user_handler()
        .handle(RegisterUserCommand {
            name: request.name,
            email: request.email,
            password: SecretString::new(request.password),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully".to_string(),
            user_id: account.id,
        }),
    ))
}

/// POST /api/auth/signin
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .sign_in_handler()
        .handle(SignInCommand {
            email: request.email,
            password: SecretString::new(request.password),
        })
        .await?;

    Ok(Json(SigninResponse::from(result)))
}

/// GET /api/auth/get
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.get_profile_handler().handle(&user.id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// POST /api/auth/start-trial
pub async fn start_trial(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.entitlements.start_trial(&user.id).await?;
    Ok(Json(StartTrialResponse {
        message: "Free trial started successfully".to_string(),
        access: view.into(),
    }))
}

/// GET /api/auth/check-gpt-access
pub async fn check_access(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.entitlements.get_access(&user.id).await?;
    Ok(Json(AccessResponse::from(view)))
}

/// GET /api/auth/trial-status
///
/// Same projection as `check-gpt-access`; kept as a separate route for
/// existing clients.
pub async fn trial_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.entitlements.get_access(&user.id).await?;
    Ok(Json(AccessResponse::from(view)))
}
