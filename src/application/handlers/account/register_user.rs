//! RegisterUserHandler - creates an account and its entitlement record.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::account::{AccountError, Registration, UserAccount};
use crate::domain::entitlement::EntitlementRecord;
use crate::domain::foundation::{Clock, UserId};
use crate::ports::{EntitlementRepository, PasswordHasher, UserRepository};

/// Command to register a new account.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Handler for account registration.
pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    entitlements: Arc<dyn EntitlementRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        entitlements: Arc<dyn EntitlementRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            entitlements,
            hasher,
            clock,
        }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<UserAccount, AccountError> {
        // 1. Validate input
        let Registration {
            name,
            email,
            password,
        } = Registration::new(&cmd.name, &cmd.email, cmd.password)?;

        // 2. Cheap duplicate check; the insert below is authoritative
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        // 3. Hash off the async runtime
        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::infrastructure(format!("hashing task failed: {}", e)))?
            .map_err(|e| AccountError::infrastructure(e.to_string()))?;

        // 4. Persist the account
        let now = self.clock.now();
        let account = UserAccount {
            id: UserId::new(),
            name,
            email,
            password_hash,
            created_at: now,
        };
        self.users.insert(&account).await?;

        // 5. Signup entitlement defaults; recreated lazily if this fails
        let record = EntitlementRecord::new_for_signup(account.id, now);
        if let Err(e) = self.entitlements.insert(&record).await {
            tracing::warn!(user_id = %account.id, error = %e, "entitlement record not created at signup");
        }

        tracing::info!(user_id = %account.id, "user registered");
        Ok(account)
    }
}
