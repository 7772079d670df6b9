//! Error types for the library desk

use thiserror::Error;

use crate::models::client::ClientValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid client: {0}")]
    InvalidClient(ClientValidationErrors),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with status {status}")]
    Server {
        status: u16,
        /// `error` string from the response body, when the server sent one
        message: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Load(String),

    #[error("{0}")]
    Submission(String),

    #[error("Operation cancelled: the form was closed")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Message supplied by the library service, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message to show to the user after a failed submission.
    ///
    /// The server's own wording wins; transport and decode failures fall
    /// back to `fallback` so raw errors never reach the screen.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(msg) | AppError::Load(msg) | AppError::Submission(msg) => {
                msg.clone()
            }
            AppError::InvalidClient(errors) => errors.to_string(),
            AppError::Cancelled => self.to_string(),
            other => other
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
