//! Client directory and registration service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::client::{
        ClientCreated, ClientDraft, ClientField, ClientKind, ClientStatus, ClientSummary,
    },
    repository::LibraryApi,
};

pub const REGISTRATION_FAILED_MESSAGE: &str = "Could not register the client.";
pub const REGISTRATION_LOCKED_MESSAGE: &str = "This client is already registered.";

#[derive(Clone)]
pub struct ClientsService {
    api: Arc<dyn LibraryApi>,
}

impl ClientsService {
    pub fn new(api: Arc<dyn LibraryApi>) -> Self {
        Self { api }
    }

    /// List clients filtered by status
    pub async fn list(&self, status: ClientStatus) -> AppResult<Vec<ClientSummary>> {
        let clients = self.api.list_clients(status).await?;
        tracing::debug!("Listed {} {} clients", clients.len(), status.as_str());
        Ok(clients)
    }

    /// Start a fresh registration session with an empty individual draft
    pub fn registration(&self) -> ClientRegistration {
        ClientRegistration::new(Arc::clone(&self.api))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationPhase {
    Editing { submit_error: Option<String> },
    Submitting,
    Registered(ClientCreated),
}

/// One registration form: a draft, its submission and its outcome
pub struct ClientRegistration {
    api: Arc<dyn LibraryApi>,
    draft: ClientDraft,
    phase: RegistrationPhase,
}

impl ClientRegistration {
    pub fn new(api: Arc<dyn LibraryApi>) -> Self {
        Self {
            api,
            draft: ClientDraft::new(),
            phase: RegistrationPhase::Editing { submit_error: None },
        }
    }

    pub fn draft(&self) -> &ClientDraft {
        &self.draft
    }

    pub fn phase(&self) -> &RegistrationPhase {
        &self.phase
    }

    pub fn set_kind(&mut self, kind: ClientKind) -> AppResult<()> {
        self.ensure_editable()?;
        self.draft.set_kind(kind);
        Ok(())
    }

    pub fn set_field(&mut self, field: ClientField, value: impl Into<String>) -> AppResult<()> {
        self.ensure_editable()?;
        self.draft.set_field(field, value);
        Ok(())
    }

    /// Validate the draft locally, then post it.
    ///
    /// Local violations come back as `AppError::InvalidClient` without any
    /// network call. A rejected post keeps the draft for another attempt.
    pub async fn submit(&mut self) -> AppResult<ClientCreated> {
        self.ensure_editable()?;

        let record = self.draft.validate_for_submission().map_err(|errors| {
            tracing::debug!("Client draft rejected locally: {}", errors);
            AppError::InvalidClient(errors)
        })?;
        let payload = record.to_submission_payload();

        self.phase = RegistrationPhase::Submitting;
        tracing::info!("Registering {} client", record.kind());

        match self.api.create_client(&payload).await {
            Ok(created) => {
                tracing::info!("Client registered");
                self.phase = RegistrationPhase::Registered(created.clone());
                Ok(created)
            }
            Err(e) => {
                tracing::error!("Client registration failed: {}", e);
                let message = e.user_message(REGISTRATION_FAILED_MESSAGE);
                self.phase = RegistrationPhase::Editing {
                    submit_error: Some(message.clone()),
                };
                Err(AppError::Submission(message))
            }
        }
    }

    fn ensure_editable(&self) -> AppResult<()> {
        match self.phase {
            RegistrationPhase::Registered(_) => {
                Err(AppError::Validation(REGISTRATION_LOCKED_MESSAGE.to_string()))
            }
            _ => Ok(()),
        }
    }
}
