//! PostgreSQL implementation of EntitlementRepository.
//!
//! The record is stored flat: each window is a start/end column pair and the
//! pending order and last payment are prefixed column groups. Updates are
//! guarded by `WHERE version = $n`; zero affected rows is reported as
//! `ConcurrentModification` (or `EntitlementNotFound` if the row is gone).

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{
    BillingCycle, EntitlementRecord, PaymentEvidence, PaymentStatus, PendingOrder, PlanType,
    TimeWindow,
};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::EntitlementRepository;

use super::{database_error, is_unique_violation};

const SELECT_COLUMNS: &str = r#"
    user_id, plan_type,
    trial_start_at, trial_end_at, trial_active,
    has_paid_plan, subscription_start_at, subscription_end_at, billing_cycle, payment_status,
    pending_order_id, pending_plan_type, pending_billing_cycle, pending_amount_minor,
    pending_currency, pending_created_at,
    last_payment_id, last_payment_order_id, last_payment_amount_minor, last_payment_currency,
    last_payment_at,
    version, created_at, updated_at
"#;

pub struct PostgresEntitlementRepository {
    pool: PgPool,
}

impl PostgresEntitlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntitlementRow {
    user_id: Uuid,
    plan_type: String,
    trial_start_at: Option<DateTime<Utc>>,
    trial_end_at: Option<DateTime<Utc>>,
    trial_active: bool,
    has_paid_plan: bool,
    subscription_start_at: Option<DateTime<Utc>>,
    subscription_end_at: Option<DateTime<Utc>>,
    billing_cycle: Option<String>,
    payment_status: Option<String>,
    pending_order_id: Option<String>,
    pending_plan_type: Option<String>,
    pending_billing_cycle: Option<String>,
    pending_amount_minor: Option<i64>,
    pending_currency: Option<String>,
    pending_created_at: Option<DateTime<Utc>>,
    last_payment_id: Option<String>,
    last_payment_order_id: Option<String>,
    last_payment_amount_minor: Option<i64>,
    last_payment_currency: Option<String>,
    last_payment_at: Option<DateTime<Utc>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, value, e),
        )
    })
}

fn window(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<TimeWindow> {
    match (start, end) {
        (Some(start), Some(end)) => Some(TimeWindow {
            start_at: Timestamp::from_datetime(start),
            end_at: Timestamp::from_datetime(end),
        }),
        _ => None,
    }
}

impl TryFrom<EntitlementRow> for EntitlementRecord {
    type Error = DomainError;

    fn try_from(row: EntitlementRow) -> Result<Self, Self::Error> {
        let pending_order = match (
            row.pending_order_id,
            row.pending_plan_type,
            row.pending_billing_cycle,
            row.pending_amount_minor,
            row.pending_currency,
            row.pending_created_at,
        ) {
            (Some(order_id), Some(plan), Some(cycle), Some(amount_minor), Some(currency), Some(at)) => {
                Some(PendingOrder {
                    order_id,
                    plan_type: parse_column("pending_plan_type", &plan)?,
                    billing_cycle: parse_column("pending_billing_cycle", &cycle)?,
                    amount_minor,
                    currency,
                    created_at: Timestamp::from_datetime(at),
                })
            }
            _ => None,
        };

        let last_payment = match (
            row.last_payment_id,
            row.last_payment_order_id,
            row.last_payment_amount_minor,
            row.last_payment_currency,
            row.last_payment_at,
        ) {
            (Some(payment_id), Some(order_id), Some(amount_minor), Some(currency), Some(at)) => {
                Some(PaymentEvidence {
                    payment_id,
                    order_id,
                    amount_minor,
                    currency,
                    paid_at: Timestamp::from_datetime(at),
                })
            }
            _ => None,
        };

        Ok(EntitlementRecord {
            user_id: UserId::from_uuid(row.user_id),
            plan_type: parse_column::<PlanType>("plan_type", &row.plan_type)?,
            trial_window: window(row.trial_start_at, row.trial_end_at),
            trial_active: row.trial_active,
            has_paid_plan: row.has_paid_plan,
            subscription_window: window(row.subscription_start_at, row.subscription_end_at),
            billing_cycle: row
                .billing_cycle
                .as_deref()
                .map(|c| parse_column::<BillingCycle>("billing_cycle", c))
                .transpose()?,
            payment_status: row
                .payment_status
                .as_deref()
                .map(|s| parse_column::<PaymentStatus>("payment_status", s))
                .transpose()?,
            pending_order,
            last_payment,
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Binds every mutable column of `record` in the order `$2..$22`.
fn bind_state<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    record: &'q EntitlementRecord,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    let pending = record.pending_order.as_ref();
    let last = record.last_payment.as_ref();

    query
        .bind(record.plan_type.as_str())
        .bind(record.trial_window.map(|w| *w.start_at.as_datetime()))
        .bind(record.trial_window.map(|w| *w.end_at.as_datetime()))
        .bind(record.trial_active)
        .bind(record.has_paid_plan)
        .bind(record.subscription_window.map(|w| *w.start_at.as_datetime()))
        .bind(record.subscription_window.map(|w| *w.end_at.as_datetime()))
        .bind(record.billing_cycle.map(|c| c.as_str()))
        .bind(record.payment_status.map(|s| s.as_str()))
        .bind(pending.map(|p| p.order_id.as_str()))
        .bind(pending.map(|p| p.plan_type.as_str()))
        .bind(pending.map(|p| p.billing_cycle.as_str()))
        .bind(pending.map(|p| p.amount_minor))
        .bind(pending.map(|p| p.currency.as_str()))
        .bind(pending.map(|p| *p.created_at.as_datetime()))
        .bind(last.map(|l| l.payment_id.as_str()))
        .bind(last.map(|l| l.order_id.as_str()))
        .bind(last.map(|l| l.amount_minor))
        .bind(last.map(|l| l.currency.as_str()))
        .bind(last.map(|l| *l.paid_at.as_datetime()))
        .bind(record.updated_at.as_datetime())
}

#[async_trait]
impl EntitlementRepository for PostgresEntitlementRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<EntitlementRecord>, DomainError> {
        let sql = format!("SELECT {} FROM entitlements WHERE user_id = $1", SELECT_COLUMNS);
        let row: Option<EntitlementRow> = sqlx::query_as(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to load entitlement", e))?;

        row.map(EntitlementRecord::try_from).transpose()
    }

    async fn insert(&self, record: &EntitlementRecord) -> Result<(), DomainError> {
        let query = sqlx::query(
            r#"
            INSERT INTO entitlements (
                user_id, plan_type,
                trial_start_at, trial_end_at, trial_active,
                has_paid_plan, subscription_start_at, subscription_end_at,
                billing_cycle, payment_status,
                pending_order_id, pending_plan_type, pending_billing_cycle,
                pending_amount_minor, pending_currency, pending_created_at,
                last_payment_id, last_payment_order_id, last_payment_amount_minor,
                last_payment_currency, last_payment_at,
                updated_at, version, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(record.user_id.as_uuid());

        bind_state(query, record)
            .bind(record.version)
            .bind(record.created_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "entitlements_pkey") {
                    return DomainError::new(
                        ErrorCode::ConcurrentModification,
                        "Entitlement record already exists",
                    );
                }
                database_error("Failed to insert entitlement", e)
            })?;

        Ok(())
    }

    async fn update(&self, record: &EntitlementRecord) -> Result<EntitlementRecord, DomainError> {
        let query = sqlx::query(
            r#"
            UPDATE entitlements SET
                plan_type = $2,
                trial_start_at = $3,
                trial_end_at = $4,
                trial_active = $5,
                has_paid_plan = $6,
                subscription_start_at = $7,
                subscription_end_at = $8,
                billing_cycle = $9,
                payment_status = $10,
                pending_order_id = $11,
                pending_plan_type = $12,
                pending_billing_cycle = $13,
                pending_amount_minor = $14,
                pending_currency = $15,
                pending_created_at = $16,
                last_payment_id = $17,
                last_payment_order_id = $18,
                last_payment_amount_minor = $19,
                last_payment_currency = $20,
                last_payment_at = $21,
                updated_at = $22,
                version = version + 1
            WHERE user_id = $1 AND version = $23
            "#,
        )
        .bind(record.user_id.as_uuid());

        let result = bind_state(query, record)
            .bind(record.version)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to update entitlement", e))?;

        if result.rows_affected() == 0 {
            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT version FROM entitlements WHERE user_id = $1")
                    .bind(record.user_id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| database_error("Failed to check entitlement", e))?;

            return Err(match exists {
                Some((actual,)) => DomainError::new(
                    ErrorCode::ConcurrentModification,
                    "Entitlement record was modified concurrently",
                )
                .with_detail("expected_version", record.version.to_string())
                .with_detail("actual_version", actual.to_string()),
                None => DomainError::new(
                    ErrorCode::EntitlementNotFound,
                    "Entitlement record not found",
                ),
            });
        }

        let mut stored = record.clone();
        stored.version = record.version + 1;
        Ok(stored)
    }
}
