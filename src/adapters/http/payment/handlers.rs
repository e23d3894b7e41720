//! HTTP handlers for payment endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::ApiJson;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::{CreatePaymentOrderCommand, VerifyPaymentCommand};
use crate::domain::entitlement::{BillingCycle, EntitlementError, PaymentCallback, PlanType};

use super::dto::{
    CreateOrderRequest, CreateOrderResponse, SubscriptionStatusResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

fn parse_plan(plan_type: &str, billing_cycle: &str) -> Result<(PlanType, BillingCycle), ApiError> {
    let plan = plan_type.parse::<PlanType>().map_err(EntitlementError::from)?;
    let cycle = billing_cycle
        .parse::<BillingCycle>()
        .map_err(EntitlementError::from)?;
    Ok((plan, cycle))
}

/// POST /api/payment/create-order
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (plan_type, billing_cycle) = parse_plan(&request.plan_type, &request.billing_cycle)?;

    let order = state
        .entitlements
        .create_payment_order(CreatePaymentOrderCommand {
            user_id: user.id,
            email: user.email,
            plan_type,
            billing_cycle,
        })
        .await?;

    Ok(Json(CreateOrderResponse::from(order)))
}

/// POST /api/payment/verify-payment
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (plan_type, billing_cycle) = parse_plan(&request.plan_type, &request.billing_cycle)?;

    let result = state
        .entitlements
        .verify_and_activate(VerifyPaymentCommand {
            user_id: user.id,
            callback: PaymentCallback {
                order_id: request.razorpay_order_id,
                payment_id: request.razorpay_payment_id,
                signature: request.razorpay_signature,
            },
            plan_type,
            billing_cycle,
        })
        .await?;

    let message = if result.replayed {
        "Payment already applied"
    } else {
        "Payment verified and subscription activated successfully"
    };

    Ok(Json(VerifyPaymentResponse {
        message: message.to_string(),
        replayed: result.replayed,
        subscription: result.status.into(),
    }))
}

/// GET /api/payment/subscription-status
pub async fn subscription_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.entitlements.subscription_status(&user.id).await?;
    Ok(Json(SubscriptionStatusResponse::from(status)))
}
