//! Loan desk service: joins the client and copy rosters into one loan
//!
//! A [`LoanComposer`] lives as long as one loan form. It loads both rosters
//! concurrently, keeps the user's selection honest against the latest
//! rosters and submits the loan. Its phase is published on a watch channel so
//! a front end can render `Loading` and `Submitting` while an operation is
//! suspended.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::{
        client::{ClientStatus, ClientSummary},
        copy::BookCopy,
        loan::{LoanReceipt, LoanRequest, LoanSelection, RosterKind},
    },
    repository::LibraryApi,
};

pub const LOAD_FAILED_MESSAGE: &str =
    "Could not load clients and book copies. Check that the library service is running.";
pub const LOAN_FAILED_MESSAGE: &str = "Could not create the loan.";
pub const INCOMPLETE_SELECTION_MESSAGE: &str = "Select a client and a book copy.";
pub const NOT_READY_MESSAGE: &str = "Clients and book copies are not loaded.";

/// Where the loan form currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerPhase {
    Loading,
    Error { message: String },
    Ready { submit_error: Option<String> },
    Submitting,
    /// The loan was created; navigation is up to the caller
    Done(LoanReceipt),
    Closed,
}

/// Cloneable handle that closes a composer from outside its owning task
#[derive(Clone)]
pub struct TeardownHandle {
    signal: Arc<watch::Sender<bool>>,
    phase: Arc<watch::Sender<ComposerPhase>>,
}

impl TeardownHandle {
    /// Close the form. In-flight loads and submissions resolve with
    /// `AppError::Cancelled` and their results are discarded.
    pub fn teardown(&self) {
        if !self.signal.send_replace(true) {
            tracing::debug!("Loan form closed");
            self.phase.send_replace(ComposerPhase::Closed);
        }
    }

    pub fn is_torn_down(&self) -> bool {
        *self.signal.borrow()
    }
}

pub struct LoanComposer {
    api: Arc<dyn LibraryApi>,
    duration_days: u32,
    phase: Arc<watch::Sender<ComposerPhase>>,
    teardown: Arc<watch::Sender<bool>>,
    clients: Vec<ClientSummary>,
    copies: Vec<BookCopy>,
    selection: LoanSelection,
}

impl LoanComposer {
    pub fn new(api: Arc<dyn LibraryApi>, duration_days: u32) -> Self {
        let (phase, _) = watch::channel(ComposerPhase::Loading);
        let (teardown, _) = watch::channel(false);
        Self {
            api,
            duration_days,
            phase: Arc::new(phase),
            teardown: Arc::new(teardown),
            clients: Vec::new(),
            copies: Vec::new(),
            selection: LoanSelection::default(),
        }
    }

    pub fn phase(&self) -> ComposerPhase {
        self.phase.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ComposerPhase> {
        self.phase.subscribe()
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            signal: Arc::clone(&self.teardown),
            phase: Arc::clone(&self.phase),
        }
    }

    pub fn clients(&self) -> &[ClientSummary] {
        &self.clients
    }

    pub fn copies(&self) -> &[BookCopy] {
        &self.copies
    }

    pub fn selection(&self) -> LoanSelection {
        self.selection
    }

    pub fn is_selection_complete(&self) -> bool {
        self.selection.is_complete()
    }

    /// Fetch both rosters concurrently and enter `Ready` or `Error`.
    ///
    /// A reload keeps the current selection; `submit` checks it against the
    /// fresh rosters. Reloading is also the way out of a `Submitting` phase
    /// left behind by an abandoned submission, whose outcome is unknown.
    pub async fn load_rosters(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        self.set_phase(ComposerPhase::Loading);
        tracing::debug!("Loading client and copy rosters");

        let api = Arc::clone(&self.api);
        let (clients, copies) = self
            .until_torn_down(async move {
                tokio::join!(api.list_clients(ClientStatus::Active), api.list_copies())
            })
            .await?;

        match (clients, copies) {
            (Ok(clients), Ok(listing)) => {
                self.clients = clients;
                self.copies = listing.into_available();
                tracing::info!(
                    "Rosters loaded: {} clients, {} available copies",
                    self.clients.len(),
                    self.copies.len()
                );
                self.set_phase(ComposerPhase::Ready { submit_error: None });
                Ok(())
            }
            (clients, copies) => {
                if let Err(e) = &clients {
                    tracing::error!("Failed to load clients roster: {}", e);
                }
                if let Err(e) = &copies {
                    tracing::error!("Failed to load copies roster: {}", e);
                }
                self.clients.clear();
                self.copies.clear();
                self.set_phase(ComposerPhase::Error {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                });
                Err(AppError::Load(LOAD_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Pick a client or a copy; ids outside the loaded roster are refused
    pub fn select(&mut self, kind: RosterKind, id: i32) -> AppResult<()> {
        self.ensure_open()?;
        if !self.is_ready() {
            return Err(AppError::Validation(NOT_READY_MESSAGE.to_string()));
        }
        if !self.in_roster(kind, id) {
            tracing::warn!("Rejected selection of unknown {} {}", kind, id);
            return Err(AppError::Validation(format!(
                "No {} with id {} in the current list.",
                kind, id
            )));
        }
        self.selection.set(kind, id);
        Ok(())
    }

    /// Create the loan for the current selection.
    ///
    /// Contract violations (not ready, incomplete or stale selection) fail
    /// without touching the network. A rejected submission returns to
    /// `Ready` with the message and the selection untouched.
    pub async fn submit(&mut self) -> AppResult<LoanReceipt> {
        self.ensure_open()?;
        if !self.is_ready() {
            return Err(AppError::Validation(NOT_READY_MESSAGE.to_string()));
        }
        let (Some(client_id), Some(copy_id)) = (self.selection.client_id, self.selection.copy_id)
        else {
            return Err(AppError::Validation(INCOMPLETE_SELECTION_MESSAGE.to_string()));
        };
        for (kind, id) in [(RosterKind::Client, client_id), (RosterKind::Copy, copy_id)] {
            if !self.in_roster(kind, id) {
                tracing::warn!("Selected {} {} is no longer listed", kind, id);
                return Err(AppError::Validation(format!(
                    "The selected {} is no longer available. Please pick another one.",
                    kind
                )));
            }
        }

        let request = LoanRequest {
            client_id,
            copy_id,
            duration_days: self.duration_days,
        };
        self.set_phase(ComposerPhase::Submitting);
        tracing::info!("Submitting loan of copy {} to client {}", copy_id, client_id);

        let api = Arc::clone(&self.api);
        let outcome = self
            .until_torn_down(async move { api.create_loan(&request).await })
            .await?;

        match outcome {
            Ok(receipt) => {
                tracing::info!("Loan created for client {} (copy {})", client_id, copy_id);
                self.set_phase(ComposerPhase::Done(receipt.clone()));
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Loan creation failed: {}", e);
                let message = e.user_message(LOAN_FAILED_MESSAGE);
                self.set_phase(ComposerPhase::Ready {
                    submit_error: Some(message.clone()),
                });
                Err(AppError::Submission(message))
            }
        }
    }

    fn is_ready(&self) -> bool {
        matches!(*self.phase.borrow(), ComposerPhase::Ready { .. })
    }

    fn in_roster(&self, kind: RosterKind, id: i32) -> bool {
        match kind {
            RosterKind::Client => self.clients.iter().any(|c| c.id == id),
            RosterKind::Copy => self.copies.iter().any(|c| c.id == id),
        }
    }

    fn ensure_open(&self) -> AppResult<()> {
        if *self.teardown.borrow() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    fn set_phase(&self, phase: ComposerPhase) {
        self.phase.send_replace(phase);
    }

    /// Race `fut` against teardown; a closed form never sees the output
    async fn until_torn_down<F: Future>(&self, fut: F) -> AppResult<F::Output> {
        let signal = self.teardown.subscribe();
        let output = tokio::select! {
            biased;
            _ = torn_down(signal) => return Err(AppError::Cancelled),
            output = fut => output,
        };
        self.ensure_open()?;
        Ok(output)
    }
}

impl Drop for LoanComposer {
    fn drop(&mut self) {
        self.teardown.send_replace(true);
    }
}

async fn torn_down(mut signal: watch::Receiver<bool>) {
    loop {
        let down = *signal.borrow_and_update();
        if down {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
