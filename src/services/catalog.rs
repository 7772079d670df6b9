//! Catalogue browsing service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{book::Book, copy::BookCopy},
    repository::LibraryApi,
};

#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn LibraryApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn LibraryApi>) -> Self {
        Self { api }
    }

    /// List every book in the catalogue
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = self.api.list_books().await?;
        tracing::debug!("Catalogue holds {} books", books.len());
        Ok(books)
    }

    /// List the physical copies open for loan
    pub async fn list_copies(&self) -> AppResult<Vec<BookCopy>> {
        let copies = self.api.list_copies().await?.into_available();
        tracing::debug!("{} copies available", copies.len());
        Ok(copies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::copy::CopiesListing, repository::MockLibraryApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_books() {
        let mut api = MockLibraryApi::new();
        api.expect_list_books().times(1).returning(|| {
            Ok(vec![serde_json::from_value(json!({
                "ISBN": "9780441013593",
                "Title": "Dune",
                "Review": 4.5
            }))
            .unwrap()])
        });

        let books = CatalogService::new(Arc::new(api)).list_books().await.unwrap();
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].rating_label(), "4.5");
    }

    #[tokio::test]
    async fn test_list_books_propagates_failure() {
        let mut api = MockLibraryApi::new();
        api.expect_list_books()
            .returning(|| Err(AppError::Server { status: 503, message: None }));

        let result = CatalogService::new(Arc::new(api)).list_books().await;
        assert!(matches!(result, Err(AppError::Server { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_list_copies_keeps_available_only() {
        let mut api = MockLibraryApi::new();
        api.expect_list_copies().times(1).returning(|| {
            Ok(CopiesListing::from_body(json!({
                "physical_books": [
                    { "idPhysicalBook": 10, "ISBN": 9780441013593u64, "Title": "Dune" },
                    { "idPhysicalBook": 11, "Title": "Emma", "Status": "BORROWED" }
                ]
            })))
        });

        let copies = CatalogService::new(Arc::new(api)).list_copies().await.unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].isbn.as_deref(), Some("9780441013593"));
    }

    #[tokio::test]
    async fn test_list_copies_without_collection_is_empty() {
        let mut api = MockLibraryApi::new();
        api.expect_list_copies()
            .returning(|| Ok(CopiesListing::from_body(json!({}))));

        let copies = CatalogService::new(Arc::new(api)).list_copies().await.unwrap();
        assert!(copies.is_empty());
    }
}
