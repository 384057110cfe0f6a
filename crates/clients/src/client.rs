use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::schema::{optional_email, optional_text, require_text};
use corebank_core::{Pagination, Schema, ValidationError, ValidationResult, resource_id};

resource_id!(
    /// Client identifier assigned by the service.
    ClientId,
    "client id"
);

resource_id!(
    /// Key of the branch a client is assigned to.
    BranchKey,
    "branch key"
);

/// Client lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientState {
    PendingApproval,
    Active,
    Inactive,
    Blacklisted,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
}

impl Schema for Address {
    fn validate(&self) -> ValidationResult<()> {
        require_text("address.line1", &self.line1)?;
        require_text("address.city", &self.city)?;
        optional_text("address.line2", self.line2.as_deref())?;
        optional_text("address.postcode", self.postcode.as_deref())?;
        if self.country.len() != 2 || !self.country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::invalid(
                "address.country",
                "must be an ISO 3166-1 alpha-2 code",
            ));
        }
        Ok(())
    }
}

/// A client as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    pub state: ClientState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn full_name(&self) -> String {
        match &self.middlename {
            Some(middle) => format!("{} {} {}", self.firstname, middle, self.lastname),
            None => format!("{} {}", self.firstname, self.lastname),
        }
    }
}

impl Schema for Client {
    fn validate(&self) -> ValidationResult<()> {
        self.id.validate()?;
        require_text("firstname", &self.firstname)?;
        require_text("lastname", &self.lastname)?;
        self.branch_key.validate()?;
        self.address.validate()
    }
}

/// Body of `POST /clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl CreateClientRequest {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            middlename: None,
            email: None,
            mobile_phone: None,
            gender: None,
            birth_date: None,
            branch_key: None,
            address: None,
        }
    }
}

impl Schema for CreateClientRequest {
    fn validate(&self) -> ValidationResult<()> {
        require_text("firstname", &self.firstname)?;
        require_text("lastname", &self.lastname)?;
        optional_text("middlename", self.middlename.as_deref())?;
        optional_email("email", self.email.as_deref())?;
        optional_text("mobilePhone", self.mobile_phone.as_deref())?;
        self.branch_key.validate()?;
        self.address.validate()
    }
}

/// Body of `PUT /clients/{clientId}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ClientState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Schema for UpdateClientRequest {
    fn validate(&self) -> ValidationResult<()> {
        optional_text("firstname", self.firstname.as_deref())?;
        optional_text("lastname", self.lastname.as_deref())?;
        optional_text("middlename", self.middlename.as_deref())?;
        optional_email("email", self.email.as_deref())?;
        optional_text("mobilePhone", self.mobile_phone.as_deref())?;
        self.branch_key.validate()?;
        self.address.validate()
    }
}

/// Query of `GET /clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsParams {
    #[serde(flatten)]
    pub page: Pagination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ClientState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
}

impl Schema for ListClientsParams {
    fn validate(&self) -> ValidationResult<()> {
        self.page.validate()?;
        self.branch_key.validate()
    }
}
