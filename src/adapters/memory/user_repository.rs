//! In-memory `UserRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::{EmailAddress, UserAccount};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::new(ErrorCode::EmailTaken, "User already exists"));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, DomainError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }
}
