//! Books repository over `GET /books`

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookList},
};

use super::http::ApiClient;

#[derive(Clone)]
pub struct BooksRepository {
    api: ApiClient,
}

impl BooksRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List the catalogue
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let body = self.api.get("books", &[]).await?;
        let list: BookList = serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("Invalid books listing: {}", e)))?;
        Ok(list.books)
    }
}
