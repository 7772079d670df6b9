//! Library Desk
//!
//! Client-side core of a library front desk: client registration with
//! per-kind validation, catalogue and directory listings, and a loan form
//! that joins the client and copy rosters into a loan request against the
//! library service HTTP API.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by every front end
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire the HTTP repository and the services from configuration
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = repository::ApiClient::new(&config.api.base_url)?;
        let repository: Arc<dyn repository::LibraryApi> =
            Arc::new(repository::Repository::new(api));
        let services = services::Services::new(repository, config.loans.clone());

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
