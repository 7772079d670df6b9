//! Physical book copy (exemplar) model and related types

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::scalar;

/// Status value the service uses for copies that can be loaned
pub const AVAILABLE_STATUS: &str = "AVAILABLE";

/// One loanable physical copy, as listed by `GET /physicalBooks`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookCopy {
    #[serde(rename = "idPhysicalBook")]
    pub id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "BranchName", default)]
    pub branch: Option<String>,
    #[serde(rename = "ISBN", default, deserialize_with = "scalar::optional_text")]
    pub isbn: Option<String>,
    #[serde(rename = "Author", default)]
    pub author: Option<String>,
    #[serde(rename = "Publisher", default)]
    pub publisher: Option<String>,
    #[serde(rename = "Edition", default, deserialize_with = "scalar::optional_text")]
    pub edition: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

impl BookCopy {
    /// A copy without a status is trusted to be available, since the
    /// endpoint itself is the availability source.
    pub fn is_available(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case(AVAILABLE_STATUS))
    }
}

impl fmt::Display for BookCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (copy ID:{})", self.title, self.id)?;
        if let Some(branch) = &self.branch {
            write!(f, " - {}", branch)?;
        }
        Ok(())
    }
}

/// What the copies endpoint actually handed back
#[derive(Debug, Clone, PartialEq)]
pub enum CopiesListing {
    Present(Vec<BookCopy>),
    /// `physical_books` key absent or null
    Missing,
    /// `physical_books` present but not a list of copies
    Malformed(String),
}

impl CopiesListing {
    /// Read the `physical_books` collection. Entries that do not decode are
    /// skipped one by one so a single odd row never hides the others.
    pub fn from_body(mut body: Value) -> Self {
        match body.get_mut("physical_books").map(Value::take) {
            None | Some(Value::Null) => CopiesListing::Missing,
            Some(Value::Array(entries)) => {
                let copies = entries
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, entry)| {
                        serde_json::from_value::<BookCopy>(entry)
                            .map_err(|e| tracing::warn!("Skipping copy entry {}: {}", index, e))
                            .ok()
                    })
                    .collect();
                CopiesListing::Present(copies)
            }
            Some(other) => CopiesListing::Malformed(format!(
                "expected a list of copies, got {}",
                json_type(&other)
            )),
        }
    }

    /// Copies a loan can be made on. A missing or malformed collection is an
    /// empty roster, never a failure.
    pub fn into_available(self) -> Vec<BookCopy> {
        match self {
            CopiesListing::Present(copies) => {
                let listed = copies.len();
                let available: Vec<BookCopy> =
                    copies.into_iter().filter(BookCopy::is_available).collect();
                if available.len() < listed {
                    tracing::debug!(
                        "Skipped {} copies not marked available",
                        listed - available.len()
                    );
                }
                available
            }
            CopiesListing::Missing => {
                tracing::warn!("Copies listing has no physical_books collection, using an empty list");
                Vec::new()
            }
            CopiesListing::Malformed(reason) => {
                tracing::warn!("Malformed physical_books collection ({}), using an empty list", reason);
                Vec::new()
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
