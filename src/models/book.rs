//! Catalogue book model

use serde::Deserialize;
use std::fmt;

use super::scalar;

/// Average review score; the service sends it as a number or a decimal string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Text(String),
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{:.1}", score),
            Rating::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Book entry from `GET /books`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    #[serde(rename = "ISBN", deserialize_with = "scalar::text")]
    pub isbn: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author", default)]
    pub author: Option<String>,
    #[serde(rename = "Publisher", default)]
    pub publisher: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Review", default)]
    pub review: Option<Rating>,
}

impl Book {
    pub fn rating_label(&self) -> String {
        self.review
            .as_ref()
            .map(Rating::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Response envelope of `GET /books`
#[derive(Debug, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}
