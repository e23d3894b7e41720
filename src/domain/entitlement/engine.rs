//! Entitlement state machine.
//!
//! Pure transitions over an [`EntitlementRecord`] and an explicit `now`.
//! Nothing here performs I/O or reads the wall clock.
//!
//! Expiry is lazy: stored flags are trusted only after [`EntitlementEngine::reconcile`]
//! has compared them against the windows, and every decision reconciles first.

use crate::domain::foundation::Timestamp;

use super::{
    AccessView, EntitlementRecord, PaymentEvidence, PaymentStatus, PendingOrder, PlanType,
    SubscriptionStatus, TimeWindow, TrialError, TrialIneligibility, VerifiedPayment,
};

/// Length of the one-time free trial.
pub const TRIAL_DAYS: i64 = 7;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Decision and transition functions for trial and subscription state.
pub struct EntitlementEngine;

impl EntitlementEngine {
    /// Clears flags whose window has lapsed.
    ///
    /// A flag with no window behind it is treated as lapsed. Idempotent.
    pub fn reconcile(record: &EntitlementRecord, now: Timestamp) -> EntitlementRecord {
        let mut next = record.clone();

        if next.has_paid_plan && !window_still_valid(next.subscription_window, now) {
            next.has_paid_plan = false;
            next.payment_status = Some(PaymentStatus::Pending);
        }

        if next.trial_active && !window_still_valid(next.trial_window, now) {
            next.trial_active = false;
        }

        next
    }

    /// Starts the one-time trial.
    ///
    /// Checks run in order and the first failure wins: plan, paid, already
    /// active, already used.
    pub fn start_trial(
        record: &EntitlementRecord,
        now: Timestamp,
    ) -> Result<EntitlementRecord, TrialError> {
        let mut next = Self::reconcile(record, now);

        if next.plan_type != PlanType::Free {
            return Err(TrialError::NotEligible(TrialIneligibility::Plan));
        }
        if next.has_paid_plan {
            return Err(TrialError::NotEligible(TrialIneligibility::Paid));
        }
        if next.trial_active && next.trial_window.is_some_and(|w| w.is_open_at(now)) {
            return Err(TrialError::AlreadyActive);
        }
        if next.has_used_trial() {
            return Err(TrialError::AlreadyUsed);
        }

        next.trial_window = Some(TimeWindow::starting_at(now, TRIAL_DAYS));
        next.trial_active = true;
        next.plan_type = PlanType::Free;
        Ok(next)
    }

    /// Remembers the gateway order the user is about to pay.
    ///
    /// Replaces any earlier unpaid order.
    pub fn place_order(record: &EntitlementRecord, order: PendingOrder) -> EntitlementRecord {
        let mut next = record.clone();
        next.pending_order = Some(order);
        next
    }

    /// Grants the subscription bought by `order`.
    ///
    /// Only callable with proof of a verified payment. The window always
    /// starts at `now`; an active trial ends immediately.
    pub fn activate_subscription(
        record: &EntitlementRecord,
        payment: &VerifiedPayment,
        order: &PendingOrder,
        now: Timestamp,
    ) -> EntitlementRecord {
        let mut next = record.clone();

        next.subscription_window = Some(TimeWindow::starting_at(
            now,
            order.billing_cycle.duration_days(),
        ));
        next.plan_type = order.plan_type;
        next.has_paid_plan = true;
        next.payment_status = Some(PaymentStatus::Completed);
        next.billing_cycle = Some(order.billing_cycle);
        next.trial_active = false;
        next.pending_order = None;
        next.last_payment = Some(PaymentEvidence {
            payment_id: payment.payment_id().to_string(),
            order_id: payment.order_id().to_string(),
            amount_minor: order.amount_minor,
            currency: order.currency.clone(),
            paid_at: now,
        });

        next
    }

    /// True when `payment` is the one already applied to this record.
    pub fn is_already_applied(record: &EntitlementRecord, payment: &VerifiedPayment) -> bool {
        record.last_payment.as_ref().is_some_and(|last| {
            last.payment_id == payment.payment_id() && last.order_id == payment.order_id()
        })
    }

    /// Derives the access decision at `now`.
    pub fn compute_access(record: &EntitlementRecord, now: Timestamp) -> AccessView {
        let current = Self::reconcile(record, now);

        let active_subscription = current.has_paid_plan
            && current.subscription_window.is_some_and(|w| w.is_open_at(now));
        let active_trial = current.plan_type == PlanType::Free
            && current.trial_active
            && current.trial_window.is_some_and(|w| w.is_open_at(now));

        AccessView {
            has_access: active_subscription || active_trial,
            active_trial,
            active_subscription,
            days_remaining: remaining_days(active_trial, current.trial_window, now),
            subscription_days_remaining: remaining_days(
                active_subscription,
                current.subscription_window,
                now,
            ),
            has_used_trial: current.has_used_trial(),
            plan_type: current.plan_type,
            trial_window: current.trial_window,
            subscription_window: current.subscription_window,
            billing_cycle: current.billing_cycle,
            payment_status: current.payment_status,
        }
    }

    /// Subscription projection at `now`.
    pub fn subscription_status(record: &EntitlementRecord, now: Timestamp) -> SubscriptionStatus {
        let current = Self::reconcile(record, now);
        let active = current.has_paid_plan
            && current.subscription_window.is_some_and(|w| w.is_open_at(now));

        SubscriptionStatus {
            has_paid_plan: active,
            plan_type: current.plan_type,
            subscription_window: current.subscription_window,
            billing_cycle: current.billing_cycle,
            payment_status: current.payment_status,
            last_payment_at: current.last_payment.as_ref().map(|p| p.paid_at),
            days_remaining: remaining_days(active, current.subscription_window, now),
        }
    }
}

/// Whole days from `now` until `end`, rounded up. Zero once `end` has passed.
pub fn days_until(end: Timestamp, now: Timestamp) -> i64 {
    let millis = end.duration_since(&now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + DAY_MILLIS - 1) / DAY_MILLIS
    }
}

fn remaining_days(active: bool, window: Option<TimeWindow>, now: Timestamp) -> i64 {
    match window {
        Some(w) if active => days_until(w.end_at, now),
        _ => 0,
    }
}

fn window_still_valid(window: Option<TimeWindow>, now: Timestamp) -> bool {
    window.is_some_and(|w| !w.has_lapsed_at(now))
}
