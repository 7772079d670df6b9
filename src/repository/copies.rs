//! Physical copies repository over `GET /physicalBooks`

use crate::{error::AppResult, models::copy::CopiesListing};

use super::http::ApiClient;

#[derive(Clone)]
pub struct CopiesRepository {
    api: ApiClient,
}

impl CopiesRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the copies listing without judging its shape
    pub async fn list(&self) -> AppResult<CopiesListing> {
        let body = self.api.get("physicalBooks", &[]).await?;
        Ok(CopiesListing::from_body(body))
    }
}
