use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Normalized email address: trimmed and lowercased.
///
/// Two spellings differing only in case or surrounding whitespace identify
/// the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format(
                "email",
                "expected local@domain",
            ));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = EmailAddress::parse("  Ada.Lovelace@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada.lovelace@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            EmailAddress::parse("   "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(EmailAddress::parse("ada").is_err());
        assert!(EmailAddress::parse("@example.com").is_err());
        assert!(EmailAddress::parse("ada@").is_err());
        assert!(EmailAddress::parse("a@b@c").is_err());
        assert!(EmailAddress::parse("ada love@example.com").is_err());
    }
}
