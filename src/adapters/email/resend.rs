//! Resend HTTP mail adapter.
//!
//! Sends contact form messages to the site owner's inbox with the submitter as
//! `reply_to`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactMailer, MailError};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from_address: String,
    contact_address: String,
    site_name: String,
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(
        api_key: SecretString,
        from_address: impl Into<String>,
        contact_address: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            from_address: from_address.into(),
            contact_address: contact_address.into(),
            site_name: site_name.into(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("contact_address", &self.contact_address)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: String,
    html: String,
}

pub struct ResendContactMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendContactMailer {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn body<'a>(&'a self, message: &'a ContactMessage) -> SendEmailBody<'a> {
        SendEmailBody {
            from: &self.config.from_address,
            to: [&self.config.contact_address],
            reply_to: message.email.as_str(),
            subject: message.subject(&self.config.site_name),
            html: message.html_body(),
        }
    }
}

#[async_trait]
impl ContactMailer for ResendContactMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let url = format!("{}/emails", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.body(message))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %text, "Resend send failed");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(())
    }
}
