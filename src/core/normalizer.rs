//! Transaction normalization and direction filtering
//!
//! Raw feed records are column-indexed. The normalizer assigns the fixed
//! columns to their meaning and keeps every present column for the payment
//! note. Only incoming transactions continue down the pipeline.

use crate::types::{RawTransaction, SyncError, Transaction, DATE_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Posting date, `YYYY-MM-DD` optionally followed by a UTC offset
pub const DATE_COLUMN: &str = "column0";
/// Signed amount
pub const AMOUNT_COLUMN: &str = "column1";
/// Payer reference (variable symbol)
pub const REFERENCE_COLUMN: &str = "column5";
/// Currency code
pub const CURRENCY_COLUMN: &str = "column14";
/// Feed-assigned transaction id
pub const ID_COLUMN: &str = "column22";

/// Normalize a whole feed response
///
/// The first malformed record fails the batch.
pub fn normalize_all(raw: &[RawTransaction]) -> Result<Vec<Transaction>, SyncError> {
    raw.iter()
        .enumerate()
        .map(|(index, record)| normalize(index, record))
        .collect()
}

/// Normalize a single raw record
///
/// `index` is the record's position in the feed response and only used for
/// error reporting.
pub fn normalize(index: usize, raw: &RawTransaction) -> Result<Transaction, SyncError> {
    let id = required(index, raw, ID_COLUMN, "id")?;
    let amount_text = required(index, raw, AMOUNT_COLUMN, "amount")?;
    let currency = required(index, raw, CURRENCY_COLUMN, "currency")?;
    let date_text = required(index, raw, DATE_COLUMN, "date")?;

    let amount = parse_amount(&amount_text).ok_or_else(|| {
        SyncError::malformed_record(index, &format!("invalid amount '{}'", amount_text))
    })?;

    let posted_at = parse_posting_date(&date_text).ok_or_else(|| {
        SyncError::malformed_record(index, &format!("invalid date '{}'", date_text))
    })?;

    let reference = raw
        .column(REFERENCE_COLUMN)
        .and_then(|column| column.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let mut raw_fields = IndexMap::new();
    for column in raw.present_columns() {
        if let Some(value) = column.text() {
            raw_fields.insert(column.name.clone(), value);
        }
    }

    Ok(Transaction {
        id,
        date: posted_at.date_naive(),
        posted_at,
        amount,
        currency,
        reference,
        raw_fields,
    })
}

/// Keep only transactions bringing money in (strictly positive amount)
///
/// Outgoing and zero-amount movements never become payments.
pub fn retain_incoming(transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(Transaction::is_incoming)
        .collect()
}

fn required(
    index: usize,
    raw: &RawTransaction,
    key: &str,
    meaning: &str,
) -> Result<String, SyncError> {
    raw.column(key)
        .and_then(|column| column.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            SyncError::malformed_record(
                index,
                &format!("missing required column '{}' ({})", key, meaning),
            )
        })
}

fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parse `2024-01-02` or `2024-01-02+0100` into midnight at that offset
///
/// Dates without an offset are taken as UTC.
fn parse_posting_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let date_part = text.get(..10)?;
    let offset_part = text.get(10..).unwrap_or_default();

    let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()?;
    let midnight = date.and_time(NaiveTime::MIN);

    if offset_part.is_empty() {
        return Some(Utc.from_utc_datetime(&midnight).fixed_offset());
    }

    DateTime::parse_from_str(
        &format!("{}T00:00:00{}", date_part, offset_part),
        "%Y-%m-%dT%H:%M:%S%z",
    )
    .ok()
}
