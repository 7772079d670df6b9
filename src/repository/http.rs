//! Shared HTTP transport for the library service API

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Response, Url,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Reqwest client bound to the service base URL, always speaking JSON
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        // Without the trailing slash Url::join would drop the last segment (`/api`)
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| {
            AppError::Config(config::ConfigError::Message(format!(
                "Invalid API base URL {}: {}",
                normalized, e
            )))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Decode(format!("Invalid request path {}: {}", path, e)))
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        read_body(response).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> AppResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        read_body(response).await
    }
}

/// Turn a response into its JSON body, or into `AppError::Server`.
///
/// Some service routes answer rejections with a 2xx status and an `error`
/// body, so the body is checked even on success.
async fn read_body(response: Response) -> AppResult<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;

    let body = if bytes.is_empty() {
        Some(Value::Null)
    } else {
        serde_json::from_slice::<Value>(&bytes).ok()
    };
    let server_error = body.as_ref().and_then(error_message);

    if !status.is_success() || server_error.is_some() {
        tracing::debug!("Service rejected request with status {}: {:?}", status, server_error);
        return Err(AppError::Server {
            status: status.as_u16(),
            message: server_error,
        });
    }

    body.ok_or_else(|| AppError::Decode(format!("Response with status {} is not JSON", status)))
}

/// `error` string of a service response body
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "Error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
