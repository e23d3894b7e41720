//! SignInHandler - checks credentials and issues a session token.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::account::{AccountError, EmailAddress};
use crate::domain::foundation::{AuthenticatedUser, Clock, Timestamp, UserId};
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

#[derive(Debug)]
pub struct SignInCommand {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct SignInResult {
    pub token: String,
    pub expires_at: Timestamp,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

pub struct SignInHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl SignInHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            clock,
        }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, AccountError> {
        // Malformed emails cannot belong to an account
        let Ok(email) = EmailAddress::parse(&cmd.email) else {
            return Err(AccountError::InvalidCredentials);
        };

        let Some(account) = self.users.find_by_email(&email).await? else {
            tracing::debug!("sign-in for unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let stored_hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AccountError::infrastructure(format!("hashing task failed: {}", e)))?
            .map_err(|e| AccountError::infrastructure(e.to_string()))?;

        if !matches {
            tracing::debug!(user_id = %account.id, "sign-in with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self
            .issuer
            .issue(
                &AuthenticatedUser::new(account.id, account.email.as_str()),
                self.clock.now(),
            )
            .map_err(|e| AccountError::infrastructure(e.to_string()))?;

        tracing::info!(user_id = %account.id, "user signed in");
        Ok(SignInResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user_id: account.id,
            name: account.name,
            email: account.email.to_string(),
        })
    }
}
