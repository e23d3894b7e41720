//! Recording mailer for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactMailer, MailError};

#[derive(Clone, Default)]
pub struct MockContactMailer {
    sent: Arc<Mutex<Vec<ContactMessage>>>,
    failure: Option<String>,
}

impl MockContactMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactMailer for MockContactMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        if let Some(failure) = &self.failure {
            return Err(MailError::Transport(failure.clone()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
