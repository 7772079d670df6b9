//! Clients repository over `/clients`

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::client::{ClientCreated, ClientPayload, ClientStatus, ClientSummary},
};

use super::http::ApiClient;

/// Response envelope of `GET /clients`; the `clients` key is mandatory
#[derive(Debug, Deserialize)]
struct ClientList {
    clients: Vec<ClientSummary>,
}

#[derive(Clone)]
pub struct ClientsRepository {
    api: ApiClient,
}

impl ClientsRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List clients filtered by status
    pub async fn list(&self, status: ClientStatus) -> AppResult<Vec<ClientSummary>> {
        let body = self
            .api
            .get("clients", &[("status", status.as_str())])
            .await?;
        let list: ClientList = serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("Invalid clients listing: {}", e)))?;
        Ok(list.clients)
    }

    /// Register a client
    pub async fn create(&self, payload: &ClientPayload) -> AppResult<ClientCreated> {
        let body = self.api.post("clients", payload).await?;
        if body == Value::Null {
            return Ok(ClientCreated::default());
        }
        serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("Invalid client creation response: {}", e)))
    }
}
