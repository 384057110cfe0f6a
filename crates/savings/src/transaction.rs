use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::schema::{optional_text, require_positive};
use corebank_core::{Money, Schema, ValidationResult, resource_id};

use crate::account::SavingAccountId;

resource_id!(
    /// Identifier of a booked savings transaction.
    SavingTransactionId,
    "saving transaction id"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    InterestApplied,
    Fee,
    TransferIn,
    TransferOut,
    Adjustment,
}

/// A booked deposit, withdrawal or other balance movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingTransaction {
    pub id: SavingTransactionId,
    pub account_id: SavingAccountId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub booked_at: DateTime<Utc>,
}

impl Schema for SavingTransaction {
    fn validate(&self) -> ValidationResult<()> {
        self.id.validate()?;
        self.account_id.validate()?;
        self.amount.validate()?;
        self.balance_after.validate()
    }
}

/// Body of the deposit and withdrawal endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub amount: Money,
    /// Caller-chosen idempotency reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransactionRequest {
    pub fn new(amount: Money) -> Self {
        Self {
            amount,
            external_id: None,
            notes: None,
        }
    }
}

impl Schema for TransactionRequest {
    fn validate(&self) -> ValidationResult<()> {
        self.amount.validate()?;
        require_positive("amount", self.amount.amount)?;
        optional_text("externalId", self.external_id.as_deref())?;
        optional_text("notes", self.notes.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use corebank_core::schema::parse_value;
    use corebank_core::{Currency, ValidationError};

    use super::*;

    #[test]
    fn zero_amount_is_rejected() {
        let request = TransactionRequest::new(Money::new(0, Currency::new("EUR").unwrap()));
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::invalid("amount", "must be positive")
        );
    }

    #[test]
    fn transaction_type_is_serialized_as_type() {
        let transaction: SavingTransaction = parse_value(json!({
            "id": "t-1",
            "accountId": "s-1",
            "type": "INTEREST_APPLIED",
            "amount": { "amount": 42, "currency": "EUR" },
            "bookedAt": "2024-03-31T23:59:59Z"
        }))
        .unwrap();
        assert_eq!(transaction.kind, TransactionType::InterestApplied);

        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["type"], "INTEREST_APPLIED");
        assert!(value.get("kind").is_none());
    }
}
