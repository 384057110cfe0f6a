use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_clients::{BranchKey, ClientId};
use corebank_core::schema::{optional_text, require_text};
use corebank_core::{Currency, Money, Pagination, Schema, ValidationError, ValidationResult, resource_id};

resource_id!(
    /// Savings account identifier.
    SavingAccountId,
    "saving account id"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    PendingApproval,
    Approved,
    Active,
    Locked,
    Dormant,
    Closed,
}

impl AccountState {
    /// Whether the account still accepts transactions.
    pub fn is_open(&self) -> bool {
        matches!(self, AccountState::Active | AccountState::Approved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SavingAccountType {
    CurrentAccount,
    RegularSavings,
    FixedDeposit,
    SavingsPlan,
}

/// Annual interest rate in percent; must be finite and non-negative.
fn check_rate(rate: Option<f64>) -> ValidationResult<()> {
    match rate {
        Some(r) if !r.is_finite() || r < 0.0 => {
            Err(ValidationError::invalid("interestRate", "must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// A savings account as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingAccount {
    pub id: SavingAccountId,
    pub client_id: ClientId,
    pub name: String,
    pub account_type: SavingAccountType,
    pub state: AccountState,
    pub balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Schema for SavingAccount {
    fn validate(&self) -> ValidationResult<()> {
        self.id.validate()?;
        self.client_id.validate()?;
        require_text("name", &self.name)?;
        self.balance.validate()?;
        self.available_balance.validate()?;
        check_rate(self.interest_rate)?;
        self.branch_key.validate()
    }
}

/// Body of `POST /savings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavingAccountRequest {
    pub client_id: ClientId,
    pub name: String,
    pub account_type: SavingAccountType,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
}

impl Schema for CreateSavingAccountRequest {
    fn validate(&self) -> ValidationResult<()> {
        self.client_id.validate()?;
        require_text("name", &self.name)?;
        self.currency.validate()?;
        check_rate(self.interest_rate)?;
        self.branch_key.validate()
    }
}

/// Body of `PUT /savings/{savingAccountId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSavingAccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    /// Largest single withdrawal allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_withdrawal_amount: Option<Money>,
}

impl Schema for UpdateSavingAccountRequest {
    fn validate(&self) -> ValidationResult<()> {
        optional_text("name", self.name.as_deref())?;
        check_rate(self.interest_rate)?;
        self.max_withdrawal_amount.validate()
    }
}

/// Body of `POST /savings/{savingAccountId}/close`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSavingAccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Schema for CloseSavingAccountRequest {
    fn validate(&self) -> ValidationResult<()> {
        optional_text("notes", self.notes.as_deref())
    }
}

/// Query of `GET /savings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSavingAccountsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AccountState>,
    #[serde(flatten)]
    pub page: Pagination,
}

impl Schema for ListSavingAccountsParams {
    fn validate(&self) -> ValidationResult<()> {
        self.client_id.validate()?;
        self.page.validate()
    }
}
