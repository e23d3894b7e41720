//! Entitlement domain - trial and subscription lifecycle.
//!
//! A user's access to the gated feature is derived from one
//! [`EntitlementRecord`]: a one-time seven day trial, a paid subscription
//! window, and the evidence of the last verified payment.
//!
//! # Module Structure
//!
//! - `record` - Persisted per-user state
//! - `engine` - Pure transitions and the access decision
//! - `verifier` - Gateway signature check producing `VerifiedPayment`
//! - `pricing` - Price table for purchasable plans
//! - `access` - Read models returned to callers
//! - `errors` - Trial and entitlement errors

mod access;
mod engine;
mod errors;
mod payment_status;
mod plan;
mod pricing;
mod record;
mod verifier;

pub use access::{AccessView, SubscriptionStatus};
pub use engine::{days_until, EntitlementEngine, TRIAL_DAYS};
pub use errors::{EntitlementError, TrialError, TrialIneligibility};
pub use payment_status::PaymentStatus;
pub use plan::{BillingCycle, PlanType};
pub use pricing::{PlanPrice, PriceTable, Quote};
pub use record::{EntitlementRecord, PaymentEvidence, PendingOrder, TimeWindow};
pub use verifier::{
    compute_signature, verify_signature, PaymentCallback, PaymentVerifier, VerifiedPayment,
};
