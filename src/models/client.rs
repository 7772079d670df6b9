//! Client model: the individual / organization tagged union, its editable
//! draft and the listing projection.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

use super::{
    address::{Address, AddressDraft, AddressField, ListedAddress},
    scalar,
};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));

/// Client kinds (PF = pessoa física, PJ = pessoa jurídica on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientKind {
    #[default]
    #[serde(rename = "PF")]
    Individual,
    #[serde(rename = "PJ")]
    Organization,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Individual => "PF",
            ClientKind::Organization => "PJ",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClientKind::Individual => "Individual",
            ClientKind::Organization => "Organization",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for ClientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pf" | "individual" => Ok(ClientKind::Individual),
            "pj" | "organization" => Ok(ClientKind::Organization),
            _ => Err(format!("Invalid client kind: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Field paths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndividualField {
    NationalId,
    FirstName,
    MiddleName,
    LastName,
    BirthDate,
}

impl IndividualField {
    fn as_str(&self) -> &'static str {
        match self {
            IndividualField::NationalId => "national_id",
            IndividualField::FirstName => "first_name",
            IndividualField::MiddleName => "middle_name",
            IndividualField::LastName => "last_name",
            IndividualField::BirthDate => "birth_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationField {
    NationalId,
    LegalName,
    TradeName,
}

impl OrganizationField {
    fn as_str(&self) -> &'static str {
        match self {
            OrganizationField::NationalId => "national_id",
            OrganizationField::LegalName => "legal_name",
            OrganizationField::TradeName => "trade_name",
        }
    }
}

/// Typed path to one editable leaf of a client draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    Email,
    Phone,
    Address(AddressField),
    Individual(IndividualField),
    Organization(OrganizationField),
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientField::Email => write!(f, "email"),
            ClientField::Phone => write!(f, "phone"),
            ClientField::Address(field) => write!(f, "address.{}", field),
            ClientField::Individual(field) => write!(f, "individual.{}", field.as_str()),
            ClientField::Organization(field) => write!(f, "organization.{}", field.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    InvalidEmail,
    NotNumeric,
    InvalidDate,
    FutureDate,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Violation::Missing => "is required",
            Violation::InvalidEmail => "is not a valid email address",
            Violation::NotNumeric => "must contain digits only",
            Violation::InvalidDate => "must be a date formatted as YYYY-MM-DD",
            Violation::FutureDate => "cannot be in the future",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: ClientField,
    pub violation: Violation,
}

/// Every unmet constraint found on a draft, in field order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientValidationErrors(Vec<FieldViolation>);

impl ClientValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn fields(&self) -> Vec<ClientField> {
        self.0.iter().map(|v| v.field).collect()
    }

    pub fn contains(&self, field: ClientField) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ClientValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{} {}", v.field, v.violation))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ClientValidationErrors {}

/// Collects violations while every check runs
#[derive(Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn flag(&mut self, field: ClientField, violation: Violation) {
        self.violations.push(FieldViolation { field, violation });
    }

    fn required(&mut self, field: ClientField, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            self.flag(field, Violation::Missing);
            return None;
        }
        Some(value.to_string())
    }

    fn optional(value: &str) -> Option<String> {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn email(&mut self, value: &str) -> Option<String> {
        let email = self.required(ClientField::Email, value)?;
        if !email.validate_email() {
            self.flag(ClientField::Email, Violation::InvalidEmail);
            return None;
        }
        Some(email)
    }

    fn digits(&mut self, field: ClientField, value: &str) -> Option<String> {
        let digits = self.required(field, value)?;
        if !DIGITS.is_match(&digits) {
            self.flag(field, Violation::NotNumeric);
            return None;
        }
        Some(digits)
    }

    fn past_date(&mut self, field: ClientField, value: &str) -> Option<NaiveDate> {
        let raw = self.required(field, value)?;
        let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") else {
            self.flag(field, Violation::InvalidDate);
            return None;
        };
        if date > Local::now().date_naive() {
            self.flag(field, Violation::FutureDate);
            return None;
        }
        Some(date)
    }

    fn finish(self) -> Result<(), ClientValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ClientValidationErrors(self.violations))
        }
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualDraft {
    pub national_id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub birth_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationDraft {
    pub national_id: String,
    pub legal_name: String,
    pub trade_name: String,
}

/// Client form state, edited field by field.
///
/// Values typed for the inactive kind are kept, so switching back and forth
/// loses nothing, but only the active kind is validated and submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    kind: ClientKind,
    email: String,
    phone: String,
    address: AddressDraft,
    individual: IndividualDraft,
    organization: OrganizationDraft,
}

impl ClientDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ClientKind) {
        self.kind = kind;
    }

    pub fn set_field(&mut self, field: ClientField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ClientField::Email => self.email = value,
            ClientField::Phone => self.phone = value,
            ClientField::Address(field) => self.address.set(field, value),
            ClientField::Individual(field) => {
                let slot = match field {
                    IndividualField::NationalId => &mut self.individual.national_id,
                    IndividualField::FirstName => &mut self.individual.first_name,
                    IndividualField::MiddleName => &mut self.individual.middle_name,
                    IndividualField::LastName => &mut self.individual.last_name,
                    IndividualField::BirthDate => &mut self.individual.birth_date,
                };
                *slot = value;
            }
            ClientField::Organization(field) => {
                let slot = match field {
                    OrganizationField::NationalId => &mut self.organization.national_id,
                    OrganizationField::LegalName => &mut self.organization.legal_name,
                    OrganizationField::TradeName => &mut self.organization.trade_name,
                };
                *slot = value;
            }
        }
    }

    pub fn field(&self, field: ClientField) -> &str {
        match field {
            ClientField::Email => &self.email,
            ClientField::Phone => &self.phone,
            ClientField::Address(field) => self.address.get(field),
            ClientField::Individual(field) => match field {
                IndividualField::NationalId => &self.individual.national_id,
                IndividualField::FirstName => &self.individual.first_name,
                IndividualField::MiddleName => &self.individual.middle_name,
                IndividualField::LastName => &self.individual.last_name,
                IndividualField::BirthDate => &self.individual.birth_date,
            },
            ClientField::Organization(field) => match field {
                OrganizationField::NationalId => &self.organization.national_id,
                OrganizationField::LegalName => &self.organization.legal_name,
                OrganizationField::TradeName => &self.organization.trade_name,
            },
        }
    }

    /// Check the common, address and active-kind fields all at once
    pub fn validate_for_submission(&self) -> Result<ClientRecord, ClientValidationErrors> {
        let mut checker = Checker::default();

        let email = checker.email(&self.email);
        let phone = checker.required(ClientField::Phone, &self.phone);
        let address = self.check_address(&mut checker);
        let details = match self.kind {
            ClientKind::Individual => self.check_individual(&mut checker),
            ClientKind::Organization => self.check_organization(&mut checker),
        };

        checker.finish()?;

        match (email, phone, address, details) {
            (Some(email), Some(phone), Some(address), Some(details)) => Ok(ClientRecord {
                email,
                phone,
                address,
                details,
            }),
            // Every None above was flagged, so finish() already returned
            _ => Err(ClientValidationErrors::default()),
        }
    }

    fn check_address(&self, checker: &mut Checker) -> Option<Address> {
        let a = &self.address;
        let road = checker.required(ClientField::Address(AddressField::Road), &a.road);
        let neighbourhood = checker.required(
            ClientField::Address(AddressField::Neighbourhood),
            &a.neighbourhood,
        );
        let city = checker.required(ClientField::Address(AddressField::City), &a.city);
        let state = checker.required(ClientField::Address(AddressField::State), &a.state);
        let zip_code = checker.digits(ClientField::Address(AddressField::ZipCode), &a.zip_code);

        Some(Address {
            road: road?,
            number: Checker::optional(&a.number),
            neighbourhood: neighbourhood?,
            city: city?,
            state: state?,
            zip_code: zip_code?,
            complement: Checker::optional(&a.complement),
        })
    }

    fn check_individual(&self, checker: &mut Checker) -> Option<ClientDetails> {
        let p = &self.individual;
        let field = ClientField::Individual;
        let national_id = checker.digits(field(IndividualField::NationalId), &p.national_id);
        let first_name = checker.required(field(IndividualField::FirstName), &p.first_name);
        let last_name = checker.required(field(IndividualField::LastName), &p.last_name);
        let birth_date = checker.past_date(field(IndividualField::BirthDate), &p.birth_date);

        Some(ClientDetails::Individual(Individual {
            national_id: national_id?,
            first_name: first_name?,
            middle_name: Checker::optional(&p.middle_name),
            last_name: last_name?,
            birth_date: birth_date?,
        }))
    }

    fn check_organization(&self, checker: &mut Checker) -> Option<ClientDetails> {
        let o = &self.organization;
        let field = ClientField::Organization;
        let national_id = checker.digits(field(OrganizationField::NationalId), &o.national_id);
        let legal_name = checker.required(field(OrganizationField::LegalName), &o.legal_name);

        Some(ClientDetails::Organization(Organization {
            national_id: national_id?,
            legal_name: legal_name?,
            trade_name: Checker::optional(&o.trade_name),
        }))
    }
}

// ---------------------------------------------------------------------------
// Validated record and wire payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    #[serde(rename = "CPF")]
    pub national_id: String,
    #[serde(rename = "FName")]
    pub first_name: String,
    #[serde(rename = "MName", default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(rename = "LName")]
    pub last_name: String,
    #[serde(rename = "Birthdate")]
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "CNPJ")]
    pub national_id: String,
    #[serde(rename = "Name")]
    pub legal_name: String,
    #[serde(rename = "FantasyName", default, skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
}

/// Kind-specific part of a client, tagged by `Type` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ClientDetails {
    #[serde(rename = "PF")]
    Individual(Individual),
    #[serde(rename = "PJ")]
    Organization(Organization),
}

impl ClientDetails {
    pub fn kind(&self) -> ClientKind {
        match self {
            ClientDetails::Individual(_) => ClientKind::Individual,
            ClientDetails::Organization(_) => ClientKind::Organization,
        }
    }
}

/// Validated, immutable client snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    email: String,
    phone: String,
    address: Address,
    details: ClientDetails,
}

impl ClientRecord {
    pub fn kind(&self) -> ClientKind {
        self.details.kind()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn details(&self) -> &ClientDetails {
        &self.details
    }

    /// Body for `POST /clients`
    pub fn to_submission_payload(&self) -> ClientPayload {
        ClientPayload {
            details: self.details.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }

    /// Parse a payload back into a record, re-running every check
    pub fn from_payload(payload: &ClientPayload) -> Result<Self, ClientValidationErrors> {
        let mut draft = ClientDraft::new();
        draft.set_kind(payload.details.kind());
        draft.set_field(ClientField::Email, payload.email.as_str());
        draft.set_field(ClientField::Phone, payload.phone.as_str());
        draft.address = payload.address.to_draft();
        match &payload.details {
            ClientDetails::Individual(p) => {
                draft.individual = IndividualDraft {
                    national_id: p.national_id.clone(),
                    first_name: p.first_name.clone(),
                    middle_name: p.middle_name.clone().unwrap_or_default(),
                    last_name: p.last_name.clone(),
                    birth_date: p.birth_date.format("%Y-%m-%d").to_string(),
                };
            }
            ClientDetails::Organization(o) => {
                draft.organization = OrganizationDraft {
                    national_id: o.national_id.clone(),
                    legal_name: o.legal_name.clone(),
                    trade_name: o.trade_name.clone().unwrap_or_default(),
                };
            }
        }
        draft.validate_for_submission()
    }
}

/// Wire shape of a client: flat object with a nested `Address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    #[serde(flatten)]
    pub details: ClientDetails,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Address")]
    pub address: Address,
}

/// Success body of `POST /clients`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientCreated {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Listing filter understood by `GET /clients?status=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    All,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::All => "all",
        }
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "all" => Ok(ClientStatus::All),
            _ => Err(format!("Invalid client status: {}", s)),
        }
    }
}

/// Internal row structure for `GET /clients` entries.
///
/// Only `idClient` is mandatory: the rosters need id, name and document, so
/// an unexpected shape elsewhere in the row must not fail the listing.
#[derive(Debug, Clone, Deserialize)]
struct ClientSummaryRow {
    #[serde(rename = "idClient")]
    id: i32,
    #[serde(rename = "Type", default)]
    kind: Option<ClientKind>,
    #[serde(rename = "Name", default, deserialize_with = "scalar::optional_text")]
    name: Option<String>,
    #[serde(rename = "CPF", default, deserialize_with = "scalar::optional_text")]
    cpf: Option<String>,
    #[serde(rename = "CNPJ", default, deserialize_with = "scalar::optional_text")]
    cnpj: Option<String>,
    #[serde(rename = "FantasyName", default, deserialize_with = "scalar::optional_text")]
    fantasy_name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "scalar::optional_text")]
    email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "scalar::optional_text")]
    phone: Option<String>,
    #[serde(rename = "Address", default)]
    address: Option<serde_json::Value>,
}

fn listed_address(id: i32, raw: serde_json::Value) -> Option<Address> {
    match serde_json::from_value::<ListedAddress>(raw) {
        Ok(listed) => Some(listed.into()),
        Err(e) => {
            tracing::debug!("Ignoring unreadable address of client {}: {}", id, e);
            None
        }
    }
}

impl From<ClientSummaryRow> for ClientSummary {
    fn from(row: ClientSummaryRow) -> Self {
        let document = match row.kind {
            Some(ClientKind::Individual) => row.cpf,
            Some(ClientKind::Organization) => row.cnpj,
            None => row.cpf.or(row.cnpj),
        };
        ClientSummary {
            id: row.id,
            kind: row.kind,
            display_name: row
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("Client #{}", row.id)),
            document,
            trade_name: row.fantasy_name,
            email: row.email,
            phone: row.phone,
            address: row.address.and_then(|raw| listed_address(row.id, raw)),
        }
    }
}

/// Short client representation for rosters and directory listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ClientSummaryRow")]
pub struct ClientSummary {
    pub id: i32,
    pub kind: Option<ClientKind>,
    pub display_name: String,
    /// CPF for individuals, CNPJ for organizations
    pub document: Option<String>,
    pub trade_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}
