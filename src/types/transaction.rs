//! Transaction-related types for the bank payment sync
//!
//! This module defines the raw column-indexed records delivered by the bank
//! statement feed and the normalized transaction shape the rest of the
//! pipeline works with.

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Transaction identifier assigned by the bank feed
///
/// Stable across queries for the same underlying bank movement.
pub type TransactionId = String;

/// A single column of a raw feed record
///
/// The feed reports every column as a `{id, name, value}` triple. The value
/// may be a number or a string depending on the column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawColumn {
    /// Numeric column identifier, mirrors the `columnN` key
    #[serde(default)]
    pub id: Option<u32>,

    /// Human-readable column name, used as the key in `raw_fields`
    pub name: String,

    /// Column value; `null` means the column carries nothing
    #[serde(default)]
    pub value: Value,
}

impl RawColumn {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        RawColumn {
            id: None,
            name: name.to_string(),
            value: value.into(),
        }
    }

    /// Render the value as text, `None` when the column is empty
    pub fn text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Raw feed record keyed by column key (`column0`, `column1`, ...)
///
/// Keys keep the order in which the feed delivered them; absent columns are
/// represented as `None` and are skipped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawTransaction {
    columns: IndexMap<String, Option<RawColumn>>,
}

impl RawTransaction {
    /// Build a raw record from `(column key, column)` pairs, preserving order
    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<RawColumn>)>,
    {
        RawTransaction {
            columns: columns.into_iter().collect(),
        }
    }

    /// Look up a column by key, `None` if it is missing or empty
    pub fn column(&self, key: &str) -> Option<&RawColumn> {
        self.columns
            .get(key)
            .and_then(Option::as_ref)
            .filter(|column| !column.value.is_null())
    }

    /// Iterate over the present, non-empty columns in feed order
    pub fn present_columns(&self) -> impl Iterator<Item = &RawColumn> {
        self.columns
            .values()
            .filter_map(Option::as_ref)
            .filter(|column| !column.value.is_null())
    }
}

/// Normalized bank transaction
///
/// Immutable once produced by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Feed-assigned identifier
    pub id: TransactionId,

    /// Calendar date on which the transaction posted
    pub date: NaiveDate,

    /// Midnight of `date` at the offset the feed reported (UTC if none)
    pub posted_at: DateTime<FixedOffset>,

    /// Signed amount; positive means money received
    pub amount: Decimal,

    /// Currency code as reported by the feed
    pub currency: String,

    /// Payer reference used for client matching
    ///
    /// Absent when the payer did not supply one.
    pub reference: Option<String>,

    /// Every present column as `name -> value`, in feed order
    ///
    /// Kept verbatim for the payment note.
    pub raw_fields: IndexMap<String, String>,
}

impl Transaction {
    /// Whether this transaction represents incoming funds
    pub fn is_incoming(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_transaction_deserializes_in_feed_order() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "column22": {"value": 26962199069u64, "name": "ID pohybu", "id": 22},
            "column0": {"value": "2024-01-02+0100", "name": "Datum", "id": 0},
            "column5": null,
            "column1": {"value": 1500.0, "name": "Objem", "id": 1}
        }))
        .unwrap();

        let names: Vec<&str> = raw.present_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID pohybu", "Datum", "Objem"]);
        assert!(raw.column("column5").is_none());
        assert!(raw.column("column99").is_none());
        assert_eq!(
            raw.column("column22").and_then(RawColumn::text),
            Some("26962199069".to_string())
        );
    }

    #[test]
    fn test_column_with_null_value_is_treated_as_absent() {
        let raw = RawTransaction::from_columns(vec![(
            "column5".to_string(),
            Some(RawColumn::new("VS", Value::Null)),
        )]);

        assert!(raw.column("column5").is_none());
        assert_eq!(raw.present_columns().count(), 0);
    }

    #[test]
    fn test_is_incoming() {
        let mut tx = Transaction {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            posted_at: DateTime::parse_from_rfc3339("2024-01-02T00:00:00+01:00").unwrap(),
            amount: Decimal::new(100, 0),
            currency: "CZK".to_string(),
            reference: None,
            raw_fields: IndexMap::new(),
        };
        assert!(tx.is_incoming());

        tx.amount = Decimal::ZERO;
        assert!(!tx.is_incoming());

        tx.amount = Decimal::new(-100, 0);
        assert!(!tx.is_incoming());
    }
}
