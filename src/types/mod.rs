//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: raw feed records and normalized transactions
//! - `checkpoint`: persisted progress and the feed window derived from it
//! - `payment`: billing-system records, match results and payment payloads
//! - `error`: Error types for the sync engine

pub mod checkpoint;
pub mod error;
pub mod payment;
pub mod transaction;

pub use checkpoint::{Checkpoint, FeedWindow, DATE_FORMAT};
pub use error::SyncError;
pub use payment::{
    ClientId, ClientRecord, InvoiceId, InvoiceRecord, MatchResult, Payment, PaymentMethod,
    PostedPayment,
};
pub use transaction::{RawColumn, RawTransaction, Transaction, TransactionId};
