//! Bank Payment Sync Library
//! # Overview
//!
//! This library incrementally imports incoming bank transactions from a
//! statement feed into a billing system as payments, posting each bank
//! transaction exactly once across repeated, overlapping or interrupted runs.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, Checkpoint, Payment, etc.)
//! - [`cli`] - CLI arguments and environment configuration
//! - [`core`] - Business logic components:
//!   - [`core::window`] - Feed window determination from the checkpoint
//!   - [`core::normalizer`] - Raw record normalization and direction filter
//!   - [`core::resume`] - Skipping transactions posted by an earlier run
//!   - [`core::matcher`] - Client/invoice matching strategies
//!   - [`core::poster`] - Payment building and posting
//!   - [`core::engine`] - Run orchestration
//! - [`io`] - Checkpoint file, bank feed and billing HTTP clients, CSV report
//!
//! # Exactly-once posting
//!
//! The feed can only be queried by date range. Progress is therefore kept as
//! a checkpoint of `(last date, last posted transaction id)`:
//!
//! - after every accepted payment the checkpoint points at that transaction
//! - after a complete run it points at the end of the window with no id
//! - a run resuming mid-day re-fetches that day and skips up to the recorded
//!   id; if the id is no longer in the feed the run aborts before posting
//!
//! # Operational precondition
//!
//! Two runs must never use the same checkpoint concurrently. There is no
//! locking; schedule runs so they cannot overlap.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{MatchStrategy, RunState, RunSummary, SyncConfig, SyncEngine};
pub use io::{write_payments_csv, FileCheckpointStore, FioClient, UcrmClient};
pub use types::{Checkpoint, MatchResult, Payment, SyncError, Transaction, TransactionId};
