//! Email configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Inbox that receives contact form messages
    pub contact_email: String,

    /// Prefix for contact message subjects
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn api_key(&self) -> SecretString {
        SecretString::new(self.resend_api_key.clone())
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !self.contact_email.contains('@') {
            return Err(ValidationError::InvalidContactEmail);
        }
        Ok(())
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("resend_api_key", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("contact_email", &self.contact_email)
            .field("site_name", &self.site_name)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            contact_email: String::new(),
            site_name: default_site_name(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@floracarbon.com".to_string()
}

fn default_from_name() -> String {
    "Flora Carbon".to_string()
}

fn default_site_name() -> String {
    "Flora Carbon".to_string()
}
