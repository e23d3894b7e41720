//! HTTP DTOs for account and entitlement endpoints.
//!
//! Field names follow the JSON the web client already consumes
//! (`isTrialActive`, `trialEndDate`, ...).

use serde::{Deserialize, Serialize};

use crate::application::handlers::account::{ProfileView, SignInResult};
use crate::domain::entitlement::{AccessView, BillingCycle, PaymentStatus, PlanType};
use crate::domain::foundation::{Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Missing fields deserialize as empty and are rejected by domain validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub expires_at: Timestamp,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

impl From<SignInResult> for SigninResponse {
    fn from(result: SignInResult) -> Self {
        Self {
            token: result.token,
            expires_at: result.expires_at,
            user_id: result.user_id,
            name: result.name,
            email: result.email,
        }
    }
}

/// Time-checked access decision with its supporting facts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub has_access: bool,
    pub is_trial_active: bool,
    pub has_paid_plan: bool,
    pub has_used_trial: bool,
    pub plan_type: PlanType,
    pub days_remaining: i64,
    pub subscription_days_remaining: i64,
    pub trial_start_date: Option<Timestamp>,
    pub trial_end_date: Option<Timestamp>,
    pub subscription_start_date: Option<Timestamp>,
    pub subscription_end_date: Option<Timestamp>,
    pub billing_cycle: Option<BillingCycle>,
    pub payment_status: Option<PaymentStatus>,
}

impl From<AccessView> for AccessResponse {
    fn from(view: AccessView) -> Self {
        Self {
            has_access: view.has_access,
            is_trial_active: view.active_trial,
            has_paid_plan: view.active_subscription,
            has_used_trial: view.has_used_trial,
            plan_type: view.plan_type,
            days_remaining: view.days_remaining,
            subscription_days_remaining: view.subscription_days_remaining,
            trial_start_date: view.trial_window.map(|w| w.start_at),
            trial_end_date: view.trial_window.map(|w| w.end_at),
            subscription_start_date: view.subscription_window.map(|w| w.start_at),
            subscription_end_date: view.subscription_window.map(|w| w.end_at),
            billing_cycle: view.billing_cycle,
            payment_status: view.payment_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub access: AccessResponse,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            id: view.account.id,
            name: view.account.name,
            email: view.account.email.to_string(),
            access: view.access.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrialResponse {
    pub message: String,
    #[serde(flatten)]
    pub access: AccessResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::TimeWindow;

    fn view() -> AccessView {
        let start = Timestamp::from_unix_millis(1_717_200_000_000).unwrap();
        AccessView {
            has_access: true,
            active_trial: true,
            active_subscription: false,
            days_remaining: 7,
            subscription_days_remaining: 0,
            has_used_trial: true,
            plan_type: PlanType::Free,
            trial_window: Some(TimeWindow::starting_at(start, 7)),
            subscription_window: None,
            billing_cycle: None,
            payment_status: None,
        }
    }

    #[test]
    fn access_response_uses_client_field_names() {
        let json = serde_json::to_value(AccessResponse::from(view())).unwrap();
        assert_eq!(json["isTrialActive"], true);
        assert_eq!(json["hasPaidPlan"], false);
        assert_eq!(json["daysRemaining"], 7);
        assert_eq!(json["planType"], "free");
        assert!(json["trialEndDate"].is_string());
        assert!(json["subscriptionEndDate"].is_null());
    }

    #[test]
    fn signup_request_tolerates_missing_fields() {
        let req: SignupRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert!(req.password.is_empty());
    }

    #[test]
    fn start_trial_response_is_flat() {
        let json = serde_json::to_value(StartTrialResponse {
            message: "Free trial started successfully".to_string(),
            access: view().into(),
        })
        .unwrap();
        assert_eq!(json["message"], "Free trial started successfully");
        assert_eq!(json["hasAccess"], true);
    }
}
