//! In-memory `EntitlementRepository` with version checks.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entitlement::EntitlementRecord;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::EntitlementRepository;

/// Stores one entitlement record per user behind a single lock.
///
/// `update` behaves like the Postgres adapter: the write lands only when the
/// caller's `version` matches the stored one, and the stored version is bumped.
#[derive(Debug, Default)]
pub struct InMemoryEntitlementRepository {
    records: RwLock<HashMap<UserId, EntitlementRecord>>,
}

impl InMemoryEntitlementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a user's record. Test helper for the lazy-creation path.
    pub async fn remove(&self, user_id: &UserId) -> Option<EntitlementRecord> {
        self.records.write().await.remove(user_id)
    }
}

#[async_trait]
impl EntitlementRepository for InMemoryEntitlementRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<EntitlementRecord>, DomainError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn insert(&self, record: &EntitlementRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.user_id) {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Entitlement record already exists",
            ));
        }
        records.insert(record.user_id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &EntitlementRecord) -> Result<EntitlementRecord, DomainError> {
        let mut records = self.records.write().await;
        let stored = records.get_mut(&record.user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::EntitlementNotFound, "Entitlement record not found")
        })?;

        if stored.version != record.version {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Entitlement record was modified concurrently",
            )
            .with_detail("expected_version", record.version.to_string())
            .with_detail("actual_version", stored.version.to_string()));
        }

        let mut next = record.clone();
        next.version = record.version + 1;
        *stored = next.clone();
        Ok(next)
    }
}
