//! Core business logic module
//!
//! This module contains the sync pipeline components:
//! - `traits` - Collaborator seams (bank feed, billing system, checkpoint store)
//! - `window` - Feed window determination from the checkpoint
//! - `normalizer` - Raw record normalization and direction filter
//! - `resume` - Skipping transactions already posted by an earlier run
//! - `matcher` - Client/invoice matching strategies
//! - `poster` - Payment building, submission and checkpoint advance
//! - `engine` - Run orchestration

pub mod engine;
pub mod matcher;
pub mod normalizer;
pub mod poster;
pub mod resume;
pub mod traits;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{RunState, RunSummary, SyncConfig, SyncEngine};
pub use matcher::{ClientMatcher, MatchStrategy};
pub use poster::PaymentPoster;
pub use traits::{BankFeed, BillingApi, CheckpointStore, QueryFilter};
