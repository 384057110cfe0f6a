use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::schema::{optional_text, require_positive};
use corebank_core::{Money, Pagination, Schema, ValidationError, ValidationResult, resource_id};
use corebank_savings::SavingAccountId;

resource_id!(
    /// Transfer identifier.
    TransferId,
    "transfer id"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// Movement of funds between two accounts held at the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: TransferId,
    pub source_account_id: SavingAccountId,
    pub target_account_id: SavingAccountId,
    pub amount: Money,
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Schema for Transfer {
    fn validate(&self) -> ValidationResult<()> {
        self.id.validate()?;
        self.source_account_id.validate()?;
        self.target_account_id.validate()?;
        self.amount.validate()
    }
}

/// Body of `POST /transfers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub source_account_id: SavingAccountId,
    pub target_account_id: SavingAccountId,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl CreateTransferRequest {
    pub fn new(source: SavingAccountId, target: SavingAccountId, amount: Money) -> Self {
        Self {
            source_account_id: source,
            target_account_id: target,
            amount,
            description: None,
            external_id: None,
        }
    }
}

impl Schema for CreateTransferRequest {
    fn validate(&self) -> ValidationResult<()> {
        self.source_account_id.validate()?;
        self.target_account_id.validate()?;
        if self.source_account_id == self.target_account_id {
            return Err(ValidationError::invalid(
                "targetAccountId",
                "must differ from sourceAccountId",
            ));
        }
        self.amount.validate()?;
        require_positive("amount", self.amount.amount)?;
        optional_text("description", self.description.as_deref())?;
        optional_text("externalId", self.external_id.as_deref())
    }
}

/// Body of `POST /transfers/{transferId}/cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTransferRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Schema for CancelTransferRequest {
    fn validate(&self) -> ValidationResult<()> {
        optional_text("reason", self.reason.as_deref())
    }
}

/// Query of `GET /transfers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransfersParams {
    /// Matches transfers where the account is either side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<SavingAccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransferStatus>,
    #[serde(flatten)]
    pub page: Pagination,
}

impl Schema for ListTransfersParams {
    fn validate(&self) -> ValidationResult<()> {
        self.account_id.validate()?;
        self.page.validate()
    }
}
