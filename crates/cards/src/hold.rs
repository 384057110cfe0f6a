use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::schema::{optional_text, require_positive, require_text};
use corebank_core::{Money, Schema, ValidationError, ValidationResult, resource_id};

resource_id!(
    /// Opaque card reference issued by the card processor.
    CardReferenceToken,
    "card reference token"
);

resource_id!(
    /// Caller-chosen identifier of an authorization hold.
    AuthorizationId,
    "authorization id"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    Pending,
    Settled,
    Reversed,
    Expired,
}

/// Point-of-sale details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub name: String,
    /// ISO 18245 merchant category code (four digits).
    pub category_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Schema for Merchant {
    fn validate(&self) -> ValidationResult<()> {
        require_text("merchant.name", &self.name)?;
        if self.category_code.len() != 4 || !self.category_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid("merchant.categoryCode", "must be four digits"));
        }
        optional_text("merchant.city", self.city.as_deref())?;
        optional_text("merchant.country", self.country.as_deref())
    }
}

/// Funds reserved on a card account pending settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationHold {
    pub external_reference_id: AuthorizationId,
    pub card_reference_token: CardReferenceToken,
    pub amount: Money,
    pub status: HoldStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<Merchant>,
    /// Advice holds are recorded even if they exceed the available balance.
    #[serde(default)]
    pub advice: bool,
    pub created_at: DateTime<Utc>,
}

impl Schema for AuthorizationHold {
    fn validate(&self) -> ValidationResult<()> {
        self.external_reference_id.validate()?;
        self.card_reference_token.validate()?;
        self.amount.validate()?;
        self.merchant.validate()
    }
}

/// Body of `POST /cards/{cardReferenceToken}/authorization-holds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorizationHoldRequest {
    pub external_reference_id: AuthorizationId,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<Merchant>,
    #[serde(default)]
    pub advice: bool,
}

impl CreateAuthorizationHoldRequest {
    pub fn new(external_reference_id: AuthorizationId, amount: Money) -> Self {
        Self {
            external_reference_id,
            amount,
            merchant: None,
            advice: false,
        }
    }
}

impl Schema for CreateAuthorizationHoldRequest {
    fn validate(&self) -> ValidationResult<()> {
        self.external_reference_id.validate()?;
        self.amount.validate()?;
        require_positive("amount", self.amount.amount)?;
        self.merchant.validate()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use corebank_core::Currency;
    use corebank_core::schema::parse_value;

    use super::*;

    #[test]
    fn merchant_category_code_must_be_four_digits() {
        let mut request = CreateAuthorizationHoldRequest::new(
            AuthorizationId::new("auth-1").unwrap(),
            Money::new(1200, Currency::new("EUR").unwrap()),
        );
        request.merchant = Some(Merchant {
            name: "Corner Cafe".to_string(),
            category_code: "58x2".to_string(),
            city: None,
            country: None,
        });
        assert_eq!(request.validate().unwrap_err().field(), Some("merchant.categoryCode"));

        if let Some(merchant) = request.merchant.as_mut() {
            merchant.category_code = "5812".to_string();
        }
        assert!(request.validate().is_ok());
    }

    #[test]
    fn hold_defaults_advice_to_false() {
        let hold: AuthorizationHold = parse_value(json!({
            "externalReferenceId": "auth-1",
            "cardReferenceToken": "card-tok-1",
            "amount": { "amount": 1200, "currency": "EUR" },
            "status": "PENDING",
            "createdAt": "2024-07-01T18:45:00Z"
        }))
        .unwrap();
        assert!(!hold.advice);
        assert_eq!(hold.status, HoldStatus::Pending);
    }

    #[test]
    fn card_token_cannot_contain_path_separators() {
        assert!(CardReferenceToken::new("abc/def").is_err());
        assert!(CardReferenceToken::new("   ").is_err());
    }
}
