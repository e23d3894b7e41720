//! Payment gateway port.
//!
//! The gateway creates orders the client then pays through hosted checkout.
//! Payment confirmation does not come through this port: it arrives as a
//! signed callback checked by `PaymentVerifier`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entitlement::{BillingCycle, PlanType};
use crate::domain::foundation::UserId;

/// Port for order creation at the payment gateway.
///
/// Calls are made once; failures are reported, never retried here.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;

    /// Public key id handed to the client-side checkout widget.
    fn key_id(&self) -> &str;
}

/// Request to create a gateway order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    /// Amount in minor units.
    pub amount_minor: i64,
    pub currency: String,
    /// Merchant reference, at most 40 characters.
    pub receipt: String,
    pub notes: OrderNotes,
}

/// Metadata attached to an order for reconciliation in the gateway dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    pub user_id: UserId,
    pub email: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
}

/// Order as created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// Gateway call failure.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(String),

    #[error("gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn order_notes_serialize_camel_case() {
        let notes = OrderNotes {
            user_id: UserId::new(),
            email: "ada@example.com".to_string(),
            plan_type: PlanType::Individual,
            billing_cycle: BillingCycle::Annual,
        };
        let json = serde_json::to_value(&notes).unwrap();
        assert_eq!(json["planType"], "individual");
        assert_eq!(json["billingCycle"], "annual");
        assert!(json.get("userId").is_some());
    }
}
