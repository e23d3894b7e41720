//! SendContactMessageHandler - relays a contact form to the site owner.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::contact::ContactMessage;
use crate::domain::foundation::ValidationError;
use crate::ports::{ContactMailer, MailError};

#[derive(Debug, Clone)]
pub struct SendContactMessageCommand {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error sending email")]
    Delivery(#[source] MailError),
}

pub struct SendContactMessageHandler {
    mailer: Arc<dyn ContactMailer>,
}

impl SendContactMessageHandler {
    pub fn new(mailer: Arc<dyn ContactMailer>) -> Self {
        Self { mailer }
    }

    pub async fn handle(&self, cmd: SendContactMessageCommand) -> Result<(), ContactError> {
        let message = ContactMessage::new(&cmd.name, &cmd.email, &cmd.message)?;

        self.mailer.send(&message).await.map_err(|e| {
            tracing::error!(error = %e, "contact message delivery failed");
            ContactError::Delivery(e)
        })?;

        tracing::info!(reply_to = %message.email, "contact message delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockContactMailer;

    fn cmd(email: &str) -> SendContactMessageCommand {
        SendContactMessageCommand {
            name: "Grace".to_string(),
            email: email.to_string(),
            message: "Do you ship to Pune?".to_string(),
        }
    }

    #[tokio::test]
    async fn delivers_valid_message() {
        let mailer = Arc::new(MockContactMailer::new());
        let handler = SendContactMessageHandler::new(mailer.clone());

        handler.handle(cmd("grace@example.com")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].email.as_str(), "grace@example.com");
    }

    #[tokio::test]
    async fn invalid_input_is_not_sent() {
        let mailer = Arc::new(MockContactMailer::new());
        let handler = SendContactMessageHandler::new(mailer.clone());

        let err = handler.handle(cmd("nope")).await.unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_delivery_error() {
        let mailer = Arc::new(MockContactMailer::failing("smtp down"));
        let handler = SendContactMessageHandler::new(mailer);

        let err = handler.handle(cmd("grace@example.com")).await.unwrap_err();
        assert!(matches!(err, ContactError::Delivery(_)));
    }
}
