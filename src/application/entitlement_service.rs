//! EntitlementService - runs the entitlement engine against storage.
//!
//! Every operation is one read-modify-write of a single user's record:
//!
//! 1. take the per-user lock (serializes requests within this process)
//! 2. load the record, creating it if the account predates it
//! 3. apply a pure engine transition at `clock.now()`
//! 4. if the state changed, compare-and-swap it on `version`
//!
//! A lost CAS (another process wrote first) re-runs steps 2-4, up to
//! `MAX_WRITE_ATTEMPTS` times. Gateway calls happen once, before the loop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

use crate::domain::entitlement::{
    AccessView, BillingCycle, EntitlementEngine, EntitlementError, EntitlementRecord,
    PaymentCallback, PaymentVerifier, PendingOrder, PlanType, PriceTable, SubscriptionStatus,
};
use crate::domain::foundation::{Clock, DomainError, Timestamp, UserId, ValidationError};
use crate::ports::{
    CreateOrderRequest, EntitlementRepository, OrderNotes, PaymentGateway, UserRepository,
};

/// Attempts at a conditional write before giving up.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Lock entries are pruned once the table grows past this many users.
const LOCK_TABLE_PRUNE_AT: usize = 1024;

/// Command to create a gateway order for a plan purchase.
#[derive(Debug, Clone)]
pub struct CreatePaymentOrderCommand {
    pub user_id: UserId,
    pub email: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
}

/// Order details the client needs to open checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: String,
    /// Minor units, as the gateway reports it.
    pub amount_minor: i64,
    pub currency: String,
    pub key_id: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
}

/// Command to verify a checkout callback and activate the subscription.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    pub user_id: UserId,
    pub callback: PaymentCallback,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationResult {
    pub status: SubscriptionStatus,
    /// True when this payment had already been applied; nothing changed.
    pub replayed: bool,
}

/// Orchestrates entitlement operations for the API layer.
#[derive(Clone)]
pub struct EntitlementService {
    entitlements: Arc<dyn EntitlementRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: PaymentVerifier,
    prices: PriceTable,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
}

impl EntitlementService {
    pub fn new(
        entitlements: Arc<dyn EntitlementRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: PaymentVerifier,
        prices: PriceTable,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entitlements,
            users,
            gateway,
            verifier,
            prices,
            clock,
            locks: Arc::new(UserLocks::default()),
        }
    }

    /// Current access decision. Persists any lazily expired flags.
    pub async fn get_access(&self, user_id: &UserId) -> Result<AccessView, EntitlementError> {
        let (_, view) = self
            .mutate(user_id, |record, now| {
                Ok((
                    EntitlementEngine::reconcile(record, now),
                    EntitlementEngine::compute_access(record, now),
                ))
            })
            .await?;
        Ok(view)
    }

    /// Starts the user's one-time trial.
    pub async fn start_trial(&self, user_id: &UserId) -> Result<AccessView, EntitlementError> {
        let (_, view) = self
            .mutate(user_id, |record, now| {
                let next = EntitlementEngine::start_trial(record, now)?;
                let view = EntitlementEngine::compute_access(&next, now);
                Ok((next, view))
            })
            .await?;

        tracing::info!(user_id = %user_id, "trial started");
        Ok(view)
    }

    /// Subscription projection. Persists any lazily expired flags.
    pub async fn subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<SubscriptionStatus, EntitlementError> {
        let (_, status) = self
            .mutate(user_id, |record, now| {
                Ok((
                    EntitlementEngine::reconcile(record, now),
                    EntitlementEngine::subscription_status(record, now),
                ))
            })
            .await?;
        Ok(status)
    }

    /// Prices the plan, creates a gateway order and remembers it on the record.
    pub async fn create_payment_order(
        &self,
        cmd: CreatePaymentOrderCommand,
    ) -> Result<PaymentOrder, EntitlementError> {
        // 1. Price the plan (rejects free/custom)
        let quote = self.prices.quote(cmd.plan_type, cmd.billing_cycle)?;

        // 2. Make sure the account exists before talking to the gateway
        self.load_or_create(&cmd.user_id).await?;

        // 3. Create the order, once
        let now = self.clock.now();
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor: quote.amount_minor,
                currency: quote.currency.clone(),
                receipt: receipt_id(&cmd.user_id, now),
                notes: OrderNotes {
                    user_id: cmd.user_id,
                    email: cmd.email,
                    plan_type: cmd.plan_type,
                    billing_cycle: cmd.billing_cycle,
                },
            })
            .await
            .map_err(|e| {
                tracing::error!(user_id = %cmd.user_id, error = %e, "gateway order creation failed");
                EntitlementError::gateway(e.to_string())
            })?;

        // 4. Remember it for the ownership check at verification
        let pending = PendingOrder {
            order_id: order.id.clone(),
            plan_type: cmd.plan_type,
            billing_cycle: cmd.billing_cycle,
            amount_minor: order.amount_minor,
            currency: order.currency.clone(),
            created_at: now,
        };
        self.mutate(&cmd.user_id, |record, _| {
            Ok((EntitlementEngine::place_order(record, pending.clone()), ()))
        })
        .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            order_id = %order.id,
            plan = %cmd.plan_type,
            cycle = %cmd.billing_cycle,
            "payment order created"
        );

        Ok(PaymentOrder {
            order_id: order.id,
            amount_minor: order.amount_minor,
            currency: order.currency,
            key_id: self.gateway.key_id().to_string(),
            plan_type: cmd.plan_type,
            billing_cycle: cmd.billing_cycle,
        })
    }

    /// Verifies the checkout callback and, only then, activates the plan.
    ///
    /// The order must be the one this user last created; plan, cycle and
    /// amount come from that order.
    pub async fn verify_and_activate(
        &self,
        cmd: VerifyPaymentCommand,
    ) -> Result<ActivationResult, EntitlementError> {
        let user_id = cmd.user_id;

        // 1. Signature check; nothing is loaded or written on failure
        let Some(payment) = self.verifier.verify_payment(&cmd.callback) else {
            tracing::warn!(
                user_id = %user_id,
                order_id = %cmd.callback.order_id,
                "payment signature verification failed"
            );
            return Err(EntitlementError::PaymentVerificationFailed);
        };

        // 2. Ownership, replay and activation under the record lock
        let (_, (status, replayed)) = self
            .mutate(&user_id, |record, now| {
                if EntitlementEngine::is_already_applied(record, &payment) {
                    let status = EntitlementEngine::subscription_status(record, now);
                    return Ok((record.clone(), (status, true)));
                }

                let order = match &record.pending_order {
                    Some(order) if order.order_id == payment.order_id() => order,
                    _ => {
                        tracing::warn!(
                            user_id = %user_id,
                            order_id = %payment.order_id(),
                            "payment callback for an order not owned by this user"
                        );
                        return Err(EntitlementError::PaymentVerificationFailed);
                    }
                };

                if order.plan_type != cmd.plan_type || order.billing_cycle != cmd.billing_cycle {
                    return Err(ValidationError::invalid_format(
                        "planType",
                        "plan or billing cycle does not match the order",
                    )
                    .into());
                }

                let next = EntitlementEngine::activate_subscription(record, &payment, order, now);
                let status = EntitlementEngine::subscription_status(&next, now);
                Ok((next, (status, false)))
            })
            .await?;

        if replayed {
            tracing::info!(
                user_id = %user_id,
                payment_id = %payment.payment_id(),
                "payment already applied"
            );
        } else {
            tracing::info!(
                user_id = %user_id,
                order_id = %payment.order_id(),
                payment_id = %payment.payment_id(),
                "subscription activated"
            );
        }

        Ok(ActivationResult { status, replayed })
    }

    /// Serialized read-modify-write of one user's record.
    ///
    /// `transition` is pure and may run more than once. The record is written
    /// only when its entitlement state differs from what was read.
    async fn mutate<T, F>(
        &self,
        user_id: &UserId,
        mut transition: F,
    ) -> Result<(EntitlementRecord, T), EntitlementError>
    where
        F: FnMut(&EntitlementRecord, Timestamp) -> Result<(EntitlementRecord, T), EntitlementError>
            + Send,
        T: Send,
    {
        let lock = self.locks.lock_for(*user_id);
        let _guard = lock.lock().await;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let current = self.load_or_create(user_id).await?;
            let now = self.clock.now();
            let (mut next, output) = transition(&current, now)?;

            if next.same_state_as(&current) {
                return Ok((current, output));
            }

            next.version = current.version;
            next.updated_at = now;
            match self.entitlements.update(&next).await {
                Ok(saved) => return Ok((saved, output)),
                Err(e) if e.is_concurrent_modification() => {
                    tracing::debug!(
                        user_id = %user_id,
                        attempt,
                        "entitlement write lost a race, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(user_id = %user_id, "entitlement write abandoned after repeated conflicts");
        Err(EntitlementError::persistence(
            "record kept changing underneath the update",
        ))
    }

    /// Loads the user's record, creating the signup default if missing.
    async fn load_or_create(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementError> {
        if let Some(record) = self.entitlements.find_by_user(user_id).await? {
            return Ok(record);
        }

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(EntitlementError::NotFound(*user_id));
        }

        let record = EntitlementRecord::new_for_signup(*user_id, self.clock.now());
        match self.entitlements.insert(&record).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "created missing entitlement record");
                Ok(record)
            }
            Err(e) if e.is_concurrent_modification() => self
                .entitlements
                .find_by_user(user_id)
                .await?
                .ok_or_else(|| {
                    EntitlementError::from(DomainError::database(
                        "record vanished after a conflicting insert",
                    ))
                }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Merchant receipt: last 12 characters of the user id followed by the last
/// 8 digits of the millisecond timestamp.
pub fn receipt_id(user_id: &UserId, now: Timestamp) -> String {
    let id = user_id.to_string();
    let millis = now.as_unix_millis().to_string();
    format!("{}{}", tail(&id, 12), tail(&millis, 8))
}

fn tail(s: &str, n: usize) -> &str {
    &s[s.len().saturating_sub(n)..]
}

/// One async mutex per user, created on demand.
#[derive(Default)]
struct UserLocks {
    inner: StdMutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    fn lock_for(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if table.len() >= LOCK_TABLE_PRUNE_AT {
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        table.entry(user_id).or_default().clone()
    }
}
