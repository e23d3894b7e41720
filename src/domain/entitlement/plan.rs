//! Plan and billing cycle enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Plan a user is on.
///
/// Every account starts on `Free`. Paid plans are only reachable through a
/// verified payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Signup default; may hold a one-time trial.
    #[default]
    Free,

    /// Single-seat paid plan.
    Individual,

    /// Team plan. Priced separately; seats are not modelled.
    Group,

    /// Negotiated plan, sold by contacting sales.
    Custom,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Individual => "individual",
            PlanType::Group => "group",
            PlanType::Custom => "custom",
        }
    }

    /// Returns true for plans that can be bought through the payment gateway.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, PlanType::Individual | PlanType::Group)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanType::Free),
            "individual" => Ok(PlanType::Individual),
            "group" => Ok(PlanType::Group),
            "custom" => Ok(PlanType::Custom),
            "" => Err(ValidationError::empty_field("planType")),
            other => Err(ValidationError::invalid_format(
                "planType",
                format!("unknown plan '{}'", other),
            )),
        }
    }
}

/// How often a subscription is billed; determines the window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Annual => "annual",
        }
    }

    /// Length of the subscription window bought by one payment.
    pub fn duration_days(&self) -> i64 {
        match self {
            BillingCycle::Monthly => 30,
            BillingCycle::Annual => 365,
        }
    }

    /// Number of monthly instalments billed up front.
    pub fn months_billed(&self) -> i64 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Annual => 12,
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingCycle::Monthly),
            "annual" => Ok(BillingCycle::Annual),
            "" => Err(ValidationError::empty_field("billingCycle")),
            other => Err(ValidationError::invalid_format(
                "billingCycle",
                format!("unknown billing cycle '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_type_defaults_to_free() {
        assert_eq!(PlanType::default(), PlanType::Free);
    }

    #[test]
    fn only_individual_and_group_are_purchasable() {
        assert!(!PlanType::Free.is_purchasable());
        assert!(PlanType::Individual.is_purchasable());
        assert!(PlanType::Group.is_purchasable());
        assert!(!PlanType::Custom.is_purchasable());
    }

    #[test]
    fn plan_type_parses_wire_names() {
        assert_eq!("group".parse::<PlanType>().unwrap(), PlanType::Group);
        assert!(matches!(
            "platinum".parse::<PlanType>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            "".parse::<PlanType>(),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn plan_type_serializes_lowercase() {
        let json = serde_json::to_string(&PlanType::Individual).unwrap();
        assert_eq!(json, "\"individual\"");
    }

    #[test]
    fn billing_cycle_durations() {
        assert_eq!(BillingCycle::Monthly.duration_days(), 30);
        assert_eq!(BillingCycle::Annual.duration_days(), 365);
        assert_eq!(BillingCycle::Annual.months_billed(), 12);
    }

    #[test]
    fn billing_cycle_rejects_unknown_values() {
        assert!("weekly".parse::<BillingCycle>().is_err());
        assert_eq!("annual".parse::<BillingCycle>().unwrap(), BillingCycle::Annual);
    }
}
