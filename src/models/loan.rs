//! Loan models: the desk's in-progress selection and the create-loan wire types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which roster a selection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Client,
    Copy,
}

impl fmt::Display for RosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterKind::Client => write!(f, "client"),
            RosterKind::Copy => write!(f, "book copy"),
        }
    }
}

/// Client and copy picked so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanSelection {
    pub client_id: Option<i32>,
    pub copy_id: Option<i32>,
}

impl LoanSelection {
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.copy_id.is_some()
    }

    pub fn set(&mut self, kind: RosterKind, id: i32) {
        match kind {
            RosterKind::Client => self.client_id = Some(id),
            RosterKind::Copy => self.copy_id = Some(id),
        }
    }
}

/// Body of `POST /loans`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(rename = "idClient")]
    pub client_id: i32,
    #[serde(rename = "idPhysicalBook")]
    pub copy_id: i32,
    #[serde(rename = "BorroTimeSolicited")]
    pub duration_days: u32,
}

/// Success body of `POST /loans`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoanReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "DueDate", default)]
    pub due_date: Option<String>,
}
