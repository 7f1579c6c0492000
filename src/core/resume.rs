//! Resume filter
//!
//! When the previous run stopped in the middle of a day, the same day is
//! fetched again and everything up to and including the last posted
//! transaction has to be dropped before posting resumes.

use crate::types::{SyncError, Transaction};
use chrono::NaiveDate;

/// Drop already-processed transactions from a re-fetched batch
///
/// With no `resume_after`, the batch is returned unchanged. Otherwise the
/// batch is scanned from the front; the transaction with id `resume_after`
/// and everything before it are discarded.
///
/// # Errors
///
/// Returns [`SyncError::Consistency`] when `resume_after` does not occur in
/// the batch. Continuing would either skip unposted transactions or post
/// some twice, so the caller must abort without posting anything.
pub fn skip_processed(
    transactions: Vec<Transaction>,
    resume_after: Option<&str>,
    window_start: NaiveDate,
) -> Result<Vec<Transaction>, SyncError> {
    let Some(last_id) = resume_after else {
        return Ok(transactions);
    };

    let position = transactions
        .iter()
        .position(|tx| tx.id == last_id)
        .ok_or_else(|| SyncError::consistency(last_id, window_start))?;

    Ok(transactions.into_iter().skip(position + 1).collect())
}
