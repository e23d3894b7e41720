//! Read models derived from an entitlement record at a point in time.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::{BillingCycle, PaymentStatus, PlanType, TimeWindow};

/// Access decision plus the supporting trial/subscription facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessView {
    pub has_access: bool,
    pub active_trial: bool,
    pub active_subscription: bool,
    /// Whole days left on the trial, rounded up; 0 when not active.
    pub days_remaining: i64,
    /// Whole days left on the subscription, rounded up; 0 when not active.
    pub subscription_days_remaining: i64,
    pub has_used_trial: bool,
    pub plan_type: PlanType,
    pub trial_window: Option<TimeWindow>,
    pub subscription_window: Option<TimeWindow>,
    pub billing_cycle: Option<BillingCycle>,
    pub payment_status: Option<PaymentStatus>,
}

/// Subscription-focused projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    /// Time-checked: false once the window has lapsed.
    pub has_paid_plan: bool,
    pub plan_type: PlanType,
    pub subscription_window: Option<TimeWindow>,
    pub billing_cycle: Option<BillingCycle>,
    pub payment_status: Option<PaymentStatus>,
    pub last_payment_at: Option<Timestamp>,
    pub days_remaining: i64,
}
