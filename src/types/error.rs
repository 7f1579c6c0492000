//! Error types for the bank payment sync
//!
//! This module defines all error types that can occur during a sync run.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Soft matching errors**: no match, ambiguous match, missing reference.
//!   The transaction is still posted without a client association.
//! - **Fatal errors**: everything else. The run aborts immediately; payments
//!   already posted keep their checkpoint advances.

use thiserror::Error;

/// Main error type for the sync engine
///
/// Each variant includes the context needed to identify the offending
/// transaction or checkpoint value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// The bank feed could not be reached or returned an unusable response
    ///
    /// Fatal, no checkpoint change.
    #[error("Bank feed request failed: {message}")]
    FeedFetch {
        /// Description of the transport or decoding failure
        message: String,
    },

    /// A raw feed record lacks a required column or carries an unusable value
    ///
    /// Fatal for the whole batch.
    #[error("Malformed feed record #{index}: {message}")]
    MalformedRecord {
        /// Position of the record in the feed response
        index: usize,
        /// What is wrong with the record
        message: String,
    },

    /// The checkpointed transaction is missing from the re-fetched window
    ///
    /// Fatal; nothing is posted and the checkpoint is left as it was.
    #[error("Could not find previously processed transaction {transaction_id} in feed window starting {date}")]
    Consistency {
        /// Transaction id recorded in the checkpoint
        transaction_id: String,
        /// Checkpoint date the window was resumed from
        date: String,
    },

    /// No billing-system record matched the transaction reference
    ///
    /// Soft: the payment is posted without a client.
    #[error("No result found for transaction {transaction_id} (match by {strategy})")]
    NoMatchFound {
        transaction_id: String,
        strategy: String,
    },

    /// More than one billing-system record matched the transaction reference
    ///
    /// Soft: treated exactly like no match.
    #[error("Multiple matching results ({count}) found for transaction {transaction_id}")]
    AmbiguousMatch {
        transaction_id: String,
        count: usize,
    },

    /// The transaction carries no payer reference to match on
    ///
    /// Soft: treated exactly like no match.
    #[error("Transaction {transaction_id} has no reference to match on")]
    MissingReference { transaction_id: String },

    /// The billing system could not be queried while matching
    #[error("Billing system query failed: {message}")]
    BillingQuery { message: String },

    /// The billing system rejected or never received a payment
    ///
    /// Fatal; the remainder of the run is abandoned.
    #[error("Failed to post payment for transaction {transaction_id}: {message}")]
    Posting {
        transaction_id: String,
        message: String,
    },

    /// Reading or writing the checkpoint resource failed
    #[error("Checkpoint I/O error on '{path}': {message}")]
    CheckpointIo { path: String, message: String },

    /// The checkpoint resource exists but cannot be understood
    #[error("Invalid checkpoint '{contents}': {message}")]
    InvalidCheckpoint { contents: String, message: String },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The run report could not be written
    #[error("Failed to write report: {message}")]
    Report { message: String },
}

impl SyncError {
    /// Whether the error only downgrades a match and never aborts the run
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            SyncError::NoMatchFound { .. }
                | SyncError::AmbiguousMatch { .. }
                | SyncError::MissingReference { .. }
        )
    }
}

// Helper functions for creating common errors

impl SyncError {
    /// Create a FeedFetch error
    pub fn feed_fetch(message: impl ToString) -> Self {
        SyncError::FeedFetch {
            message: message.to_string(),
        }
    }

    /// Create a MalformedRecord error
    pub fn malformed_record(index: usize, message: &str) -> Self {
        SyncError::MalformedRecord {
            index,
            message: message.to_string(),
        }
    }

    /// Create a Consistency error
    pub fn consistency(transaction_id: &str, date: chrono::NaiveDate) -> Self {
        SyncError::Consistency {
            transaction_id: transaction_id.to_string(),
            date: date.to_string(),
        }
    }

    /// Create a NoMatchFound error
    pub fn no_match(transaction_id: &str, strategy: &str) -> Self {
        SyncError::NoMatchFound {
            transaction_id: transaction_id.to_string(),
            strategy: strategy.to_string(),
        }
    }

    /// Create an AmbiguousMatch error
    pub fn ambiguous_match(transaction_id: &str, count: usize) -> Self {
        SyncError::AmbiguousMatch {
            transaction_id: transaction_id.to_string(),
            count,
        }
    }

    /// Create a MissingReference error
    pub fn missing_reference(transaction_id: &str) -> Self {
        SyncError::MissingReference {
            transaction_id: transaction_id.to_string(),
        }
    }

    /// Create a BillingQuery error
    pub fn billing_query(message: impl ToString) -> Self {
        SyncError::BillingQuery {
            message: message.to_string(),
        }
    }

    /// Create a Posting error
    pub fn posting(transaction_id: &str, message: impl ToString) -> Self {
        SyncError::Posting {
            transaction_id: transaction_id.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a CheckpointIo error
    pub fn checkpoint_io(path: &std::path::Path, error: &std::io::Error) -> Self {
        SyncError::CheckpointIo {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create an InvalidCheckpoint error
    pub fn invalid_checkpoint(contents: &str, message: &str) -> Self {
        SyncError::InvalidCheckpoint {
            contents: contents.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl ToString) -> Self {
        SyncError::Config {
            message: message.to_string(),
        }
    }

    /// Create a Report error
    pub fn report(message: impl ToString) -> Self {
        SyncError::Report {
            message: message.to_string(),
        }
    }
}
