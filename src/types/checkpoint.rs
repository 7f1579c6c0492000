//! Synchronization progress types
//!
//! A [`Checkpoint`] records how far previous runs got; a [`FeedWindow`] is the
//! date range (and resume point) derived from it for the next run.

use super::error::SyncError;
use super::transaction::TransactionId;
use chrono::NaiveDate;
use std::fmt;

/// Date format used by the checkpoint resource and the feed URL
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted synchronization marker
///
/// * `last_transaction_id == None`: `last_date` was processed entirely, the
///   next run starts the day after.
/// * `last_transaction_id == Some(id)`: the run stopped inside `last_date`;
///   the next run re-reads that day and skips everything up to and
///   including `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub last_date: NaiveDate,
    pub last_transaction_id: Option<TransactionId>,
}

impl Checkpoint {
    /// Checkpoint for a fully processed day
    pub fn completed(last_date: NaiveDate) -> Self {
        Checkpoint {
            last_date,
            last_transaction_id: None,
        }
    }

    /// Checkpoint pointing at the last posted transaction of a day
    pub fn in_progress(last_date: NaiveDate, last_transaction_id: TransactionId) -> Self {
        Checkpoint {
            last_date,
            last_transaction_id: Some(last_transaction_id),
        }
    }

    /// Parse the two-line text form
    ///
    /// The first line is the date, the optional second line the pending
    /// transaction id. Lines are trimmed and a blank second line means no
    /// pending id.
    pub fn parse(contents: &str) -> Result<Self, SyncError> {
        let mut lines = contents.lines().map(str::trim);

        let date_line = lines.next().unwrap_or_default();
        let last_date = NaiveDate::parse_from_str(date_line, DATE_FORMAT)
            .map_err(|e| SyncError::invalid_checkpoint(date_line, &e.to_string()))?;

        let last_transaction_id = lines
            .next()
            .filter(|line| !line.is_empty())
            .map(str::to_string);

        Ok(Checkpoint {
            last_date,
            last_transaction_id,
        })
    }

    /// Render the two-line text form understood by [`Checkpoint::parse`]
    pub fn render(&self) -> String {
        match &self.last_transaction_id {
            Some(id) => format!("{}\n{}\n", self.last_date.format(DATE_FORMAT), id),
            None => format!("{}\n", self.last_date.format(DATE_FORMAT)),
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_transaction_id {
            Some(id) => write!(f, "{} after transaction {}", self.last_date, id),
            None => write!(f, "{} (day completed)", self.last_date),
        }
    }
}

/// Inclusive date range queried from the feed in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Last transaction already posted on `start`, if the previous run
    /// stopped mid-day
    pub resume_after: Option<TransactionId>,
}

impl FeedWindow {
    /// A window whose start lies after its end covers no days
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}
