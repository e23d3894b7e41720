//! GetProfileHandler - account details joined with the current access view.

use std::sync::Arc;

use crate::application::EntitlementService;
use crate::domain::account::UserAccount;
use crate::domain::entitlement::{AccessView, EntitlementError};
use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ProfileView {
    pub account: UserAccount,
    pub access: AccessView,
}

pub struct GetProfileHandler {
    users: Arc<dyn UserRepository>,
    entitlements: EntitlementService,
}

impl GetProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>, entitlements: EntitlementService) -> Self {
        Self {
            users,
            entitlements,
        }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<ProfileView, EntitlementError> {
        let account = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EntitlementError::NotFound(*user_id))?;
        let access = self.entitlements.get_access(user_id).await?;

        Ok(ProfileView { account, access })
    }
}
