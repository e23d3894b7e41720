//! Contact form endpoint under `/api/contact`.

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::ApiJson;
use crate::adapters::http::state::AppState;
use crate::application::handlers::contact::SendContactMessageCommand;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

/// POST /api/contact/send
pub async fn send_message(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .send_contact_message_handler()
        .handle(SendContactMessageCommand {
            name: request.name,
            email: request.email,
            message: request.message,
        })
        .await?;

    Ok(Json(ContactResponse {
        message: "Email sent successfully".to_string(),
    }))
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/send", post(send_message))
}
