//! Business logic services

pub mod catalog;
pub mod clients;
pub mod loans;

use std::sync::Arc;

use crate::{config::LoansConfig, repository::LibraryApi};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub clients: clients::ClientsService,
    api: Arc<dyn LibraryApi>,
    loans: LoansConfig,
}

impl Services {
    /// Create all services over the given library API
    pub fn new(api: Arc<dyn LibraryApi>, loans: LoansConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(Arc::clone(&api)),
            clients: clients::ClientsService::new(Arc::clone(&api)),
            api,
            loans,
        }
    }

    /// Open a new loan form; call `load_rosters` on it before selecting
    pub fn loan_composer(&self) -> loans::LoanComposer {
        loans::LoanComposer::new(Arc::clone(&self.api), self.loans.default_duration_days)
    }
}
