use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_clients::ClientId;
use corebank_core::schema::{optional_text, require_positive, require_text};
use corebank_core::{Money, Pagination, Schema, ValidationError, ValidationResult, resource_id};
use corebank_savings::SavingAccountId;

resource_id!(
    /// Payment identifier.
    PaymentId,
    "payment id"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
    Cancelled,
}

impl PaymentStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }
}

/// External party receiving a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    pub name: String,
    pub iban: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

/// Shape check: country code, check digits, then up to 30 alphanumerics.
fn check_iban(iban: &str) -> ValidationResult<()> {
    let bytes = iban.as_bytes();
    let valid = (15..=34).contains(&bytes.len())
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::invalid("creditor.iban", "not a valid IBAN"))
    }
}

fn check_bic(bic: Option<&str>) -> ValidationResult<()> {
    match bic {
        Some(b) if !matches!(b.len(), 8 | 11) || !b.bytes().all(|c| c.is_ascii_alphanumeric()) => {
            Err(ValidationError::invalid("creditor.bic", "must be 8 or 11 alphanumerics"))
        }
        _ => Ok(()),
    }
}

impl Schema for Counterparty {
    fn validate(&self) -> ValidationResult<()> {
        require_text("creditor.name", &self.name)?;
        check_iban(&self.iban)?;
        check_bic(self.bic.as_deref())
    }
}

/// A payment as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub account_id: SavingAccountId,
    pub amount: Money,
    pub creditor: Counterparty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Schema for Payment {
    fn validate(&self) -> ValidationResult<()> {
        self.id.validate()?;
        self.client_id.validate()?;
        self.account_id.validate()?;
        self.amount.validate()?;
        require_text("creditor.name", &self.creditor.name)
    }
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub client_id: ClientId,
    /// Account debited by the payment.
    pub account_id: SavingAccountId,
    pub amount: Money,
    pub creditor: Counterparty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Schema for CreatePaymentRequest {
    fn validate(&self) -> ValidationResult<()> {
        self.client_id.validate()?;
        self.account_id.validate()?;
        self.amount.validate()?;
        require_positive("amount", self.amount.amount)?;
        self.creditor.validate()?;
        optional_text("reference", self.reference.as_deref())?;
        optional_text("externalId", self.external_id.as_deref())
    }
}

/// Query of `GET /payments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(flatten)]
    pub page: Pagination,
}

impl Schema for ListPaymentsParams {
    fn validate(&self) -> ValidationResult<()> {
        self.client_id.validate()?;
        self.page.validate()
    }
}
