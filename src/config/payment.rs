//! Payment configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Razorpay)
#[derive(Clone, Deserialize)]
pub struct PaymentConfig {
    /// Public key id (`rzp_test_...` / `rzp_live_...`)
    pub razorpay_key_id: String,

    /// API secret; also signs checkout callbacks
    pub razorpay_key_secret: String,

    /// ISO currency code for orders
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Razorpay API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    pub fn key_secret(&self) -> SecretString {
        SecretString::new(self.razorpay_key_secret.clone())
    }

    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY_KEY_ID"));
        }
        if self.razorpay_key_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY_KEY_SECRET"));
        }
        if !self.razorpay_key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKey);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("razorpay_key_id", &self.razorpay_key_id)
            .field("razorpay_key_secret", &"[REDACTED]")
            .field("currency", &self.currency)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}
