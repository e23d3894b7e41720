//! Price table for purchasable plans.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::{BillingCycle, PlanType};

/// Monthly price of one plan, in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPrice {
    /// Price when billed every month.
    pub monthly: i64,
    /// Effective per-month price when billed annually.
    pub annual_per_month: i64,
}

impl PlanPrice {
    fn per_month(&self, cycle: BillingCycle) -> i64 {
        match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Annual => self.annual_per_month,
        }
    }
}

/// What a checkout will charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
    /// Total in minor units (paise), as sent to the gateway.
    pub amount_minor: i64,
    pub currency: String,
}

/// Injected pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    pub individual: PlanPrice,
    pub group: PlanPrice,
    pub currency: String,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            individual: PlanPrice {
                monthly: 1660,
                annual_per_month: 1494,
            },
            group: PlanPrice {
                monthly: 1660,
                annual_per_month: 1328,
            },
            currency: "INR".to_string(),
        }
    }
}

impl PriceTable {
    /// Prices a plan for checkout. Annual cycles bill twelve months up front.
    pub fn quote(&self, plan: PlanType, cycle: BillingCycle) -> Result<Quote, ValidationError> {
        let price = match plan {
            PlanType::Individual => self.individual,
            PlanType::Group => self.group,
            PlanType::Custom => {
                return Err(ValidationError::unsupported(
                    "planType",
                    "custom plans are sold by contacting sales",
                ))
            }
            PlanType::Free => {
                return Err(ValidationError::unsupported(
                    "planType",
                    "the free plan cannot be purchased",
                ))
            }
        };

        let amount_minor = price
            .per_month(cycle)
            .checked_mul(cycle.months_billed())
            .and_then(|major| major.checked_mul(100))
            .ok_or_else(|| ValidationError::invalid_format("amount", "price overflow"))?;

        Ok(Quote {
            plan_type: plan,
            billing_cycle: cycle,
            amount_minor,
            currency: self.currency.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_monthly_is_billed_in_paise() {
        let quote = PriceTable::default()
            .quote(PlanType::Individual, BillingCycle::Monthly)
            .unwrap();
        assert_eq!(quote.amount_minor, 166_000);
        assert_eq!(quote.currency, "INR");
    }

    #[test]
    fn annual_bills_twelve_discounted_months() {
        let table = PriceTable::default();

        let individual = table.quote(PlanType::Individual, BillingCycle::Annual).unwrap();
        assert_eq!(individual.amount_minor, 1494 * 12 * 100);

        let group = table.quote(PlanType::Group, BillingCycle::Annual).unwrap();
        assert_eq!(group.amount_minor, 1328 * 12 * 100);
    }

    #[test]
    fn custom_plan_points_to_sales() {
        let err = PriceTable::default()
            .quote(PlanType::Custom, BillingCycle::Monthly)
            .unwrap_err();
        assert!(err.to_string().contains("contacting sales"));
    }

    #[test]
    fn free_plan_cannot_be_bought() {
        assert!(PriceTable::default()
            .quote(PlanType::Free, BillingCycle::Annual)
            .is_err());
    }

    #[test]
    fn overflowing_price_is_rejected() {
        let table = PriceTable {
            individual: PlanPrice {
                monthly: i64::MAX,
                annual_per_month: i64::MAX,
            },
            ..PriceTable::default()
        };
        assert!(table.quote(PlanType::Individual, BillingCycle::Monthly).is_err());
    }
}
