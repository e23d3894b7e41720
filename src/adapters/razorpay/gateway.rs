//! Razorpay Orders API client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, OrderNotes, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API credentials and endpoint.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: String,
    key_secret: SecretString,
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another host (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: &'a OrderNotes,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
}

/// Creates orders with HTTP basic auth (`key_id:key_secret`).
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);
        let body = OrderBody {
            amount: request.amount_minor,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: &request.notes,
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or(text);
            tracing::error!(status = status.as_u16(), error = %message, "Razorpay create_order failed");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: OrderResponse = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse Razorpay order: {}", e))
        })?;

        tracing::debug!(order_id = %order.id, amount = order.amount, "Razorpay order created");

        Ok(GatewayOrder {
            id: order.id,
            amount_minor: order.amount,
            currency: order.currency,
        })
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }
}
