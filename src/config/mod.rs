//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `FLORA` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use flora_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod email;
mod error;
mod payment;
mod pricing;
mod server;

pub use auth::{AuthConfig, MIN_JWT_SECRET_LEN};
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use pricing::PricingConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

use crate::domain::entitlement::PriceTable;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. When absent, in-memory stores are used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Session token configuration
    pub auth: AuthConfig,

    /// Payment configuration (Razorpay)
    pub payment: PaymentConfig,

    /// Plan prices
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the `FLORA` prefix:
    ///
    /// - `FLORA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FLORA__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FLORA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        match &self.database {
            Some(database) => database.validate()?,
            None if self.is_production() => {
                return Err(ValidationError::DatabaseRequiredInProduction)
            }
            None => {}
        }
        self.auth.validate()?;
        self.payment.validate()?;
        self.pricing.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Price table in the configured payment currency.
    pub fn price_table(&self) -> PriceTable {
        self.pricing.price_table(&self.payment.currency)
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
