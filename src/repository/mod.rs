//! Repository layer: typed access to the library service HTTP API

pub mod books;
pub mod clients;
pub mod copies;
pub mod http;
pub mod loans;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        client::{ClientCreated, ClientPayload, ClientStatus, ClientSummary},
        copy::CopiesListing,
        loan::{LoanReceipt, LoanRequest},
    },
};

pub use http::ApiClient;

/// Operations the desk needs from the library service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn list_clients(&self, status: ClientStatus) -> AppResult<Vec<ClientSummary>>;

    async fn create_client(&self, payload: &ClientPayload) -> AppResult<ClientCreated>;

    /// Copies as listed by the service; shape problems are reported, not raised
    async fn list_copies(&self) -> AppResult<CopiesListing>;

    async fn create_loan(&self, request: &LoanRequest) -> AppResult<LoanReceipt>;
}

/// Main repository struct holding the per-resource repositories
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub clients: clients::ClientsRepository,
    pub copies: copies::CopiesRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository sharing one HTTP client
    pub fn new(api: ApiClient) -> Self {
        Self {
            books: books::BooksRepository::new(api.clone()),
            clients: clients::ClientsRepository::new(api.clone()),
            copies: copies::CopiesRepository::new(api.clone()),
            loans: loans::LoansRepository::new(api),
        }
    }
}

#[async_trait]
impl LibraryApi for Repository {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    async fn list_clients(&self, status: ClientStatus) -> AppResult<Vec<ClientSummary>> {
        self.clients.list(status).await
    }

    async fn create_client(&self, payload: &ClientPayload) -> AppResult<ClientCreated> {
        self.clients.create(payload).await
    }

    async fn list_copies(&self) -> AppResult<CopiesListing> {
        self.copies.list().await
    }

    async fn create_loan(&self, request: &LoanRequest) -> AppResult<LoanReceipt> {
        self.loans.create(request).await
    }
}
