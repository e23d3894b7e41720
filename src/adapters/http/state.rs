//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::account::{GetProfileHandler, RegisterUserHandler, SignInHandler};
use crate::application::handlers::contact::SendContactMessageHandler;
use crate::application::EntitlementService;
use crate::domain::foundation::Clock;
use crate::ports::{
    ContactMailer, EntitlementRepository, PasswordHasher, SessionValidator, TokenIssuer,
    UserRepository,
};

/// Dependencies shared by every request.
///
/// Cloned per request; every field is an `Arc` or cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub entitlement_repository: Arc<dyn EntitlementRepository>,
    pub entitlements: EntitlementService,
    pub hasher: Arc<dyn PasswordHasher>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub mailer: Arc<dyn ContactMailer>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn register_user_handler(&self) -> RegisterUserHandler {
        RegisterUserHandler::new(
            self.users.clone(),
            self.entitlement_repository.clone(),
            self.hasher.clone(),
            self.clock.clone(),
        )
    }

    pub fn sign_in_handler(&self) -> SignInHandler {
        SignInHandler::new(
            self.users.clone(),
            self.hasher.clone(),
            self.token_issuer.clone(),
            self.clock.clone(),
        )
    }

    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.users.clone(), self.entitlements.clone())
    }

    pub fn send_contact_message_handler(&self) -> SendContactMessageHandler {
        SendContactMessageHandler::new(self.mailer.clone())
    }
}
