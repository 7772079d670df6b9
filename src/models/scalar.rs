//! Text fields the service sends as JSON numbers or strings depending on the
//! column type behind them (ISBNs and street numbers are integer columns).

use serde::{Deserialize, Deserializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => write!(f, "{}", text),
            Scalar::Number(number) => write!(f, "{}", number),
        }
    }
}

/// `deserialize_with` target for a required text field
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

/// `deserialize_with` target for an optional text field; pair with `default`
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer).map(|value| value.map(Scalar::into_text))
}
