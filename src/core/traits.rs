//! Core traits for the external collaborators of a sync run
//!
//! The engine only talks to the bank feed, the billing system and the
//! checkpoint resource through these traits, so HTTP clients, file storage
//! and in-memory fakes can be used interchangeably.

use crate::types::{
    Checkpoint, ClientRecord, InvoiceRecord, Payment, RawTransaction, SyncError, TransactionId,
};
use chrono::NaiveDate;

/// Equality filter sent with a billing-system query, as `(field, value)` pairs
pub type QueryFilter = Vec<(&'static str, String)>;

/// Source of raw bank transactions
pub trait BankFeed {
    /// Fetch every transaction posted in the inclusive range `start..=end`
    ///
    /// Records come back in feed order, which is assumed stable for repeated
    /// queries of the same range.
    fn fetch_transactions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawTransaction>, SyncError>;
}

/// Billing system queried for clients/invoices and receiving payments
pub trait BillingApi {
    /// Query clients matching every `(field, value)` pair of the filter
    fn query_clients(&self, filter: &QueryFilter) -> Result<Vec<ClientRecord>, SyncError>;

    /// Query invoices matching every `(field, value)` pair of the filter
    fn query_invoices(&self, filter: &QueryFilter) -> Result<Vec<InvoiceRecord>, SyncError>;

    /// Submit a payment; any failure is reported as an error
    fn create_payment(&self, payment: &Payment) -> Result<(), SyncError>;
}

/// Persistent storage for the single sync checkpoint
pub trait CheckpointStore {
    /// Load the saved checkpoint, `None` if no run ever saved one
    fn load(&self) -> Result<Option<Checkpoint>, SyncError>;

    /// Overwrite the checkpoint
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), SyncError>;

    /// Record the last transaction posted on `date`
    fn save_progress(
        &mut self,
        date: NaiveDate,
        transaction_id: &TransactionId,
    ) -> Result<(), SyncError> {
        self.save(&Checkpoint::in_progress(date, transaction_id.clone()))
    }

    /// Record that every day up to and including `date` was processed
    fn save_completed(&mut self, date: NaiveDate) -> Result<(), SyncError> {
        self.save(&Checkpoint::completed(date))
    }
}
