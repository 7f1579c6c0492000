//! Feed window determination
//!
//! Turns the configured start date and the saved checkpoint into the date
//! range to query and the transaction to resume after.

use crate::types::{Checkpoint, FeedWindow, TransactionId};
use chrono::{Days, NaiveDate};

/// Determine where the next run starts
///
/// * No checkpoint: start at `configured_start`, nothing to skip.
/// * Completed checkpoint: start the day after `last_date`.
/// * In-progress checkpoint: restart on `last_date` and skip past the
///   recorded transaction.
///
/// A start that would fall before `configured_start` is replaced by
/// `configured_start` with no resume point; the configuration always wins
/// over an older checkpoint.
pub fn determine_start(
    configured_start: NaiveDate,
    checkpoint: Option<&Checkpoint>,
) -> (NaiveDate, Option<TransactionId>) {
    let Some(checkpoint) = checkpoint else {
        return (configured_start, None);
    };

    let start = match checkpoint.last_transaction_id {
        Some(_) => checkpoint.last_date,
        None => checkpoint
            .last_date
            .checked_add_days(Days::new(1))
            .unwrap_or(checkpoint.last_date),
    };

    if start < configured_start {
        return (configured_start, None);
    }

    (start, checkpoint.last_transaction_id.clone())
}

/// Last day the feed may be queried for: yesterday
///
/// The current day may still receive transactions and is never queried.
pub fn query_end(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Full feed window for a run happening on `today`
pub fn determine_window(
    configured_start: NaiveDate,
    checkpoint: Option<&Checkpoint>,
    today: NaiveDate,
) -> FeedWindow {
    let (start, resume_after) = determine_start(configured_start, checkpoint);

    FeedWindow {
        start,
        end: query_end(today),
        resume_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::no_checkpoint(None, date(2024, 1, 1), None)]
    #[case::completed_day_moves_forward(
        Some(Checkpoint::completed(date(2024, 1, 3))),
        date(2024, 1, 4),
        None
    )]
    #[case::pending_transaction_restarts_same_day(
        Some(Checkpoint::in_progress(date(2024, 1, 3), "T2".to_string())),
        date(2024, 1, 3),
        Some("T2")
    )]
    #[case::stale_completed_checkpoint(
        Some(Checkpoint::completed(date(2023, 6, 1))),
        date(2024, 1, 1),
        None
    )]
    #[case::stale_pending_checkpoint_drops_resume(
        Some(Checkpoint::in_progress(date(2023, 12, 31), "T9".to_string())),
        date(2024, 1, 1),
        None
    )]
    #[case::completed_day_before_start_lands_on_start(
        Some(Checkpoint::completed(date(2023, 12, 31))),
        date(2024, 1, 1),
        None
    )]
    #[case::pending_on_start_date(
        Some(Checkpoint::in_progress(date(2024, 1, 1), "T1".to_string())),
        date(2024, 1, 1),
        Some("T1")
    )]
    fn test_determine_start(
        #[case] checkpoint: Option<Checkpoint>,
        #[case] expected_start: NaiveDate,
        #[case] expected_resume: Option<&str>,
    ) {
        let (start, resume) = determine_start(date(2024, 1, 1), checkpoint.as_ref());
        assert_eq!(start, expected_start);
        assert_eq!(resume.as_deref(), expected_resume);
    }

    #[rstest]
    #[case(date(2024, 1, 6), date(2024, 1, 5))]
    #[case(date(2024, 3, 1), date(2024, 2, 29))]
    #[case(date(2025, 1, 1), date(2024, 12, 31))]
    fn test_query_end_is_yesterday(#[case] today: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(query_end(today), expected);
    }

    #[test]
    fn test_determine_window() {
        let checkpoint = Checkpoint::in_progress(date(2024, 1, 3), "T2".to_string());
        let window = determine_window(date(2024, 1, 1), Some(&checkpoint), date(2024, 1, 6));

        assert_eq!(
            window,
            FeedWindow {
                start: date(2024, 1, 3),
                end: date(2024, 1, 5),
                resume_after: Some("T2".to_string()),
            }
        );
    }

    #[test]
    fn test_second_run_on_same_day_yields_empty_window() {
        let checkpoint = Checkpoint::completed(date(2024, 1, 5));
        let window = determine_window(date(2024, 1, 1), Some(&checkpoint), date(2024, 1, 6));
        assert!(window.is_empty());
    }
}
