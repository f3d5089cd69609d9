use crate::domain::DiscountRule;
use crate::record_store::{required_text, FieldValue, Record, RecordStoreError};
use std::fmt;
use std::str::FromStr;

pub const CUSTOMER_ID_FIELD: &str = "Customer ID";
pub const CUSTOMER_NAME_FIELD: &str = "Name";
pub const CUSTOMER_EMAIL_FIELD: &str = "Email";
pub const CUSTOMER_TIER_FIELD: &str = "Tier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerTier {
    #[default]
    Standard,
    Premium,
}

impl CustomerTier {
    pub fn discount_rule(self) -> Option<DiscountRule> {
        match self {
            CustomerTier::Standard => None,
            CustomerTier::Premium => Some(DiscountRule::PremiumTier),
        }
    }
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerTier::Standard => write!(f, "Standard"),
            CustomerTier::Premium => write!(f, "Premium"),
        }
    }
}

impl FromStr for CustomerTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(CustomerTier::Standard),
            "premium" => Ok(CustomerTier::Premium),
            other => Err(format!("unknown customer tier: {}", other)),
        }
    }
}

/// Represents a registered customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub tier: CustomerTier,
}

/// Payload for registering a customer under a known id.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    pub tier: CustomerTier,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            tier: CustomerTier::Standard,
        }
    }

    #[allow(dead_code)]
    pub fn premium(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            tier: CustomerTier::Premium,
            ..Self::new(id, name, email)
        }
    }

    #[allow(dead_code)]
    pub fn is_premium(&self) -> bool {
        self.tier == CustomerTier::Premium
    }

    /// Total payable after this customer's tier discount. Pure.
    pub fn apply_discount(&self, total: f64) -> f64 {
        match self.tier.discount_rule() {
            Some(rule) => rule.apply(total),
            None => total,
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(CUSTOMER_ID_FIELD.to_string(), self.id.as_str().into());
        record.insert(CUSTOMER_NAME_FIELD.to_string(), self.name.as_str().into());
        record.insert(CUSTOMER_EMAIL_FIELD.to_string(), self.email.as_str().into());
        record.insert(CUSTOMER_TIER_FIELD.to_string(), self.tier.to_string().into());
        record
    }

    /// Builds a customer from a sheet row. A missing or blank `Tier` means a
    /// standard customer.
    pub fn from_record(record: &Record) -> Result<Self, RecordStoreError> {
        let tier = match record
            .get(CUSTOMER_TIER_FIELD)
            .filter(|value| !value.is_blank())
            .and_then(FieldValue::as_text)
        {
            Some(text) => text.parse::<CustomerTier>().map_err(|_| RecordStoreError::InvalidField {
                field: CUSTOMER_TIER_FIELD.to_string(),
                value: text.clone(),
            })?,
            None => CustomerTier::Standard,
        };

        Ok(Self {
            id: required_text(record, CUSTOMER_ID_FIELD)?,
            name: required_text(record, CUSTOMER_NAME_FIELD).unwrap_or_default(),
            email: required_text(record, CUSTOMER_EMAIL_FIELD).unwrap_or_default(),
            tier,
        })
    }
}

impl From<Customer> for (String, CustomerCreate) {
    fn from(customer: Customer) -> Self {
        let params = CustomerCreate {
            name: customer.name,
            email: customer.email,
            tier: customer.tier,
        };
        (customer.id, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_discount_is_ten_percent() {
        let premium = Customer::premium("C1", "Ada", "ada@example.com");
        assert!((premium.apply_discount(30.0) - 27.0).abs() < 1e-9);

        let standard = Customer::new("C2", "Bob", "bob@example.com");
        assert_eq!(standard.apply_discount(30.0), 30.0);
    }

    #[test]
    fn test_record_round_trip_keeps_tier() {
        let premium = Customer::premium("C1", "Ada", "ada@example.com");
        let record = premium.to_record();
        let labels: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Customer ID", "Name", "Email", "Tier"]);
        assert_eq!(Customer::from_record(&record).unwrap(), premium);
    }

    #[test]
    fn test_record_without_tier_is_standard() {
        let mut record = Customer::premium("C1", "Ada", "ada@example.com").to_record();
        record.shift_remove(CUSTOMER_TIER_FIELD);
        assert_eq!(Customer::from_record(&record).unwrap().tier, CustomerTier::Standard);
    }

    #[test]
    fn test_blank_tier_and_id_load() {
        let mut record = Customer::new("", "Ada", "").to_record();
        record.insert(CUSTOMER_TIER_FIELD.to_string(), "".into());
        let customer = Customer::from_record(&record).unwrap();
        assert_eq!(customer.id, "");
        assert_eq!(customer.email, "");
        assert_eq!(customer.tier, CustomerTier::Standard);
    }

    #[test]
    fn test_unknown_tier_is_rejected() {
        let mut record = Customer::new("C1", "Ada", "ada@example.com").to_record();
        record.insert(CUSTOMER_TIER_FIELD.to_string(), "Gold".into());
        assert!(matches!(
            Customer::from_record(&record),
            Err(RecordStoreError::InvalidField { .. })
        ));
    }
}
