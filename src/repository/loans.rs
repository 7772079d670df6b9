//! Loans repository over `POST /loans`

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::loan::{LoanReceipt, LoanRequest},
};

use super::http::ApiClient;

#[derive(Clone)]
pub struct LoansRepository {
    api: ApiClient,
}

impl LoansRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a loan
    pub async fn create(&self, request: &LoanRequest) -> AppResult<LoanReceipt> {
        let body = self.api.post("loans", request).await?;
        if body == Value::Null {
            return Ok(LoanReceipt::default());
        }
        serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("Invalid loan creation response: {}", e)))
    }
}
