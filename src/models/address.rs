//! Postal address value object shared by both client kinds

use serde::{Deserialize, Serialize};
use std::fmt;

use super::scalar;

/// Address sub-field, the nested part of a client field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Road,
    Number,
    Neighbourhood,
    City,
    State,
    ZipCode,
    Complement,
}

impl AddressField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::Road => "road",
            AddressField::Number => "number",
            AddressField::Neighbourhood => "neighbourhood",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::ZipCode => "zip_code",
            AddressField::Complement => "complement",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address as typed in by the user; every field may still be blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDraft {
    pub road: String,
    pub number: String,
    pub neighbourhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub complement: String,
}

impl AddressDraft {
    /// Update one sub-field, leaving its siblings untouched
    pub fn set(&mut self, field: AddressField, value: String) {
        *self.slot_mut(field) = value;
    }

    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Road => &self.road,
            AddressField::Number => &self.number,
            AddressField::Neighbourhood => &self.neighbourhood,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::ZipCode => &self.zip_code,
            AddressField::Complement => &self.complement,
        }
    }

    fn slot_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::Road => &mut self.road,
            AddressField::Number => &mut self.number,
            AddressField::Neighbourhood => &mut self.neighbourhood,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::ZipCode => &mut self.zip_code,
            AddressField::Complement => &mut self.complement,
        }
    }
}

/// Validated address, also the wire shape of the `Address` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub road: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub neighbourhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl Address {
    /// Refill a draft from a validated address
    pub fn to_draft(&self) -> AddressDraft {
        AddressDraft {
            road: self.road.clone(),
            number: self.number.clone().unwrap_or_default(),
            neighbourhood: self.neighbourhood.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            complement: self.complement.clone().unwrap_or_default(),
        }
    }
}

/// Address as listed by `GET /clients`.
///
/// The listing sends `Number` as an integer and `Complement` as `""` when
/// unset, so every field is read leniently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListedAddress {
    #[serde(default, deserialize_with = "scalar::optional_text")]
    road: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    number: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    neighbourhood: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    state: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    zip_code: Option<String>,
    #[serde(default, deserialize_with = "scalar::optional_text")]
    complement: Option<String>,
}

impl From<ListedAddress> for Address {
    fn from(row: ListedAddress) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Address {
            road: row.road.unwrap_or_default(),
            number: non_blank(row.number),
            neighbourhood: row.neighbourhood.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            zip_code: row.zip_code.unwrap_or_default(),
            complement: non_blank(row.complement),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} - {} - {}/{}",
            self.road,
            self.number.as_deref().unwrap_or("N/A"),
            self.neighbourhood,
            self.city,
            self.state
        )
    }
}
