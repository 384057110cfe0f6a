//! Monetary value objects.
//!
//! Amounts travel as integers in the smallest currency unit (e.g. cents) so
//! that no floating point rounding happens on the client side.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::schema::Schema;

/// ISO 4217 currency code (e.g. "EUR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> ValidationResult<Self> {
        let currency = Self(code.into());
        currency.validate()?;
        Ok(currency)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Schema for Currency {
    fn validate(&self) -> ValidationResult<()> {
        let code = self.0.as_str();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(())
        } else {
            Err(ValidationError::invalid(
                "currency",
                format!("'{code}' is not an ISO 4217 code"),
            ))
        }
    }
}

/// An amount in minor units together with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: u64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: u64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl Schema for Money {
    fn validate(&self) -> ValidationResult<()> {
        self.currency.validate()
    }
}
