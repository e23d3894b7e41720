//! Pricing configuration
//!
//! Prices are per month in major currency units. Custom plans have no price;
//! they are sold through sales.

use serde::Deserialize;

use crate::domain::entitlement::{PlanPrice, PriceTable};

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_individual_monthly")]
    pub individual_monthly: i64,

    #[serde(default = "default_individual_annual_per_month")]
    pub individual_annual_per_month: i64,

    #[serde(default = "default_group_monthly")]
    pub group_monthly: i64,

    #[serde(default = "default_group_annual_per_month")]
    pub group_annual_per_month: i64,
}

impl PricingConfig {
    /// Builds the price table charged in `currency`.
    pub fn price_table(&self, currency: &str) -> PriceTable {
        PriceTable {
            individual: PlanPrice {
                monthly: self.individual_monthly,
                annual_per_month: self.individual_annual_per_month,
            },
            group: PlanPrice {
                monthly: self.group_monthly,
                annual_per_month: self.group_annual_per_month,
            },
            currency: currency.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let prices = [
            ("individual monthly", self.individual_monthly),
            ("individual annual", self.individual_annual_per_month),
            ("group monthly", self.group_monthly),
            ("group annual", self.group_annual_per_month),
        ];
        for (name, price) in prices {
            if price <= 0 {
                return Err(ValidationError::InvalidPrice(name));
            }
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            individual_monthly: default_individual_monthly(),
            individual_annual_per_month: default_individual_annual_per_month(),
            group_monthly: default_group_monthly(),
            group_annual_per_month: default_group_annual_per_month(),
        }
    }
}

fn default_individual_monthly() -> i64 {
    1660
}

fn default_individual_annual_per_month() -> i64 {
    1494
}

fn default_group_monthly() -> i64 {
    1660
}

fn default_group_annual_per_month() -> i64 {
    1328
}
