//! Per-user entitlement record.
//!
//! One record exists per account. It stores the raw facts (windows, flags,
//! last payment evidence); whether a window is *currently* open is always
//! re-derived against a clock by [`EntitlementEngine`](super::EntitlementEngine).
//!
//! # Invariants
//!
//! - `trial_active` implies `trial_window` is present and `plan_type == Free`
//! - once `trial_window` is set it is never cleared
//! - `has_paid_plan` implies `subscription_window` is present and
//!   `payment_status == Completed` as of the last verification
//! - `version` increases by one on every persisted write

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::{BillingCycle, PaymentStatus, PlanType};

/// Half-open interval `[start_at, end_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

impl TimeWindow {
    /// Window of `days` whole days starting at `start_at`.
    pub fn starting_at(start_at: Timestamp, days: i64) -> Self {
        Self {
            start_at,
            end_at: start_at.plus_days(days),
        }
    }

    /// Open at `now`: the end lies strictly in the future.
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        self.end_at.is_after(&now)
    }

    /// Lapsed at `now`: the end lies strictly in the past.
    pub fn has_lapsed_at(&self, now: Timestamp) -> bool {
        self.end_at.is_before(&now)
    }
}

/// Gateway order created for this user and not yet paid.
///
/// Verification is only accepted for this order, and the plan, cycle and
/// amount granted on success come from here rather than from the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub order_id: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
    /// Amount in the currency's minor unit (paise for INR).
    pub amount_minor: i64,
    pub currency: String,
    pub created_at: Timestamp,
}

/// Audit trail of the last payment applied to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvidence {
    pub payment_id: String,
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub paid_at: Timestamp,
}

/// Trial and subscription state for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    /// Owning account.
    pub user_id: UserId,

    pub plan_type: PlanType,

    /// Set once by the first successful trial start.
    pub trial_window: Option<TimeWindow>,

    /// Cached flag; may be stale until the next reconcile.
    pub trial_active: bool,

    /// Cached flag; may be stale until the next reconcile.
    pub has_paid_plan: bool,

    pub subscription_window: Option<TimeWindow>,

    pub billing_cycle: Option<BillingCycle>,

    pub payment_status: Option<PaymentStatus>,

    pub pending_order: Option<PendingOrder>,

    pub last_payment: Option<PaymentEvidence>,

    /// Optimistic concurrency token.
    pub version: i64,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl EntitlementRecord {
    /// The state every account starts with at signup.
    pub fn new_for_signup(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            plan_type: PlanType::Free,
            trial_window: None,
            trial_active: false,
            has_paid_plan: false,
            subscription_window: None,
            billing_cycle: None,
            payment_status: None,
            pending_order: None,
            last_payment: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once a trial has ever been started, expired or not.
    pub fn has_used_trial(&self) -> bool {
        self.trial_window.is_some()
    }

    /// Compares the entitlement facts, ignoring bookkeeping columns.
    pub fn same_state_as(&self, other: &EntitlementRecord) -> bool {
        self.plan_type == other.plan_type
            && self.trial_window == other.trial_window
            && self.trial_active == other.trial_active
            && self.has_paid_plan == other.has_paid_plan
            && self.subscription_window == other.subscription_window
            && self.billing_cycle == other.billing_cycle
            && self.payment_status == other.payment_status
            && self.pending_order == other.pending_order
            && self.last_payment == other.last_payment
    }
}
