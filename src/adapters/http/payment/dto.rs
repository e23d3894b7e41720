//! HTTP DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::PaymentOrder;
use crate::domain::entitlement::{BillingCycle, PaymentStatus, PlanType, SubscriptionStatus};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Plan and cycle arrive as raw strings so unknown values become 400s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub plan_type: String,
    pub billing_cycle: String,
}

/// Checkout callback as posted by the client; gateway field names are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "planType")]
    pub plan_type: String,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
}

impl From<PaymentOrder> for CreateOrderResponse {
    fn from(order: PaymentOrder) -> Self {
        Self {
            order_id: order.order_id,
            amount: order.amount_minor,
            currency: order.currency,
            key_id: order.key_id,
            plan_type: order.plan_type,
            billing_cycle: order.billing_cycle,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub has_paid_plan: bool,
    pub plan_type: PlanType,
    pub subscription_start_date: Option<Timestamp>,
    pub subscription_end_date: Option<Timestamp>,
    pub billing_cycle: Option<BillingCycle>,
    pub payment_status: Option<PaymentStatus>,
    pub last_payment_date: Option<Timestamp>,
    pub days_remaining: i64,
}

impl From<SubscriptionStatus> for SubscriptionStatusResponse {
    fn from(status: SubscriptionStatus) -> Self {
        Self {
            has_paid_plan: status.has_paid_plan,
            plan_type: status.plan_type,
            subscription_start_date: status.subscription_window.map(|w| w.start_at),
            subscription_end_date: status.subscription_window.map(|w| w.end_at),
            billing_cycle: status.billing_cycle,
            payment_status: status.payment_status,
            last_payment_date: status.last_payment_at,
            days_remaining: status.days_remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub message: String,
    /// True when the payment had already been applied.
    pub replayed: bool,
    #[serde(flatten)]
    pub subscription: SubscriptionStatusResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_keeps_gateway_field_names() {
        let req: VerifyPaymentRequest = serde_json::from_str(
            r#"{
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "abc",
                "planType": "individual",
                "billingCycle": "monthly"
            }"#,
        )
        .unwrap();
        assert_eq!(req.razorpay_order_id, "order_1");
        assert_eq!(req.plan_type, "individual");
    }

    #[test]
    fn create_order_request_defaults_missing_fields() {
        let req: CreateOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.plan_type.is_empty());
    }

    #[test]
    fn order_response_reports_minor_units() {
        let json = serde_json::to_value(CreateOrderResponse::from(PaymentOrder {
            order_id: "order_1".to_string(),
            amount_minor: 166_000,
            currency: "INR".to_string(),
            key_id: "rzp_test".to_string(),
            plan_type: PlanType::Individual,
            billing_cycle: BillingCycle::Monthly,
        }))
        .unwrap();
        assert_eq!(json["orderId"], "order_1");
        assert_eq!(json["amount"], 166_000);
        assert_eq!(json["keyId"], "rzp_test");
    }
}
