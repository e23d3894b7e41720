//! Outbound mail port for contact form submissions.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::contact::ContactMessage;

/// Delivers contact form messages to the site owner's inbox.
#[async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Mail delivery failure.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("mail provider request failed: {0}")]
    Transport(String),

    #[error("mail provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}
