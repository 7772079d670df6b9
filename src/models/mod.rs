//! Data models for the library desk

pub mod address;
pub mod book;
pub mod client;
pub mod copy;
pub mod loan;
pub mod scalar;

// Re-export commonly used types
pub use address::{Address, AddressField};
pub use book::Book;
pub use client::{
    ClientDraft, ClientField, ClientKind, ClientPayload, ClientRecord, ClientStatus,
    ClientSummary, IndividualField, OrganizationField,
};
pub use copy::{BookCopy, CopiesListing};
pub use loan::{LoanReceipt, LoanRequest, LoanSelection, RosterKind};
