//! In-memory collaborators shared by the core unit tests

use crate::core::traits::{BankFeed, BillingApi, CheckpointStore, QueryFilter};
use crate::types::{
    Checkpoint, ClientRecord, InvoiceRecord, Payment, RawColumn, RawTransaction, SyncError,
    Transaction,
};
use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

/// Incoming 100 CZK transaction posted on 2024-01-`d`
pub fn incoming(id: &str, d: u32, reference: &str) -> Transaction {
    let mut raw_fields = IndexMap::new();
    raw_fields.insert("Datum".to_string(), format!("2024-01-{:02}+0100", d));
    raw_fields.insert("Objem".to_string(), "100.0".to_string());
    raw_fields.insert("VS".to_string(), reference.to_string());
    raw_fields.insert("ID pohybu".to_string(), id.to_string());

    Transaction {
        id: id.to_string(),
        date: day(d),
        posted_at: DateTime::parse_from_rfc3339(&format!("2024-01-{:02}T00:00:00+01:00", d))
            .unwrap(),
        amount: Decimal::new(100, 0),
        currency: "CZK".to_string(),
        reference: Some(reference.to_string()),
        raw_fields,
    }
}

/// Raw feed record in the Fio column layout
pub fn raw_record(id: &str, d: u32, amount: f64, reference: &str) -> RawTransaction {
    RawTransaction::from_columns(vec![
        (
            "column0".to_string(),
            Some(RawColumn::new("Datum", format!("2024-01-{:02}+0100", d))),
        ),
        ("column1".to_string(), Some(RawColumn::new("Objem", json!(amount)))),
        ("column5".to_string(), Some(RawColumn::new("VS", reference))),
        ("column14".to_string(), Some(RawColumn::new("Měna", "CZK"))),
        ("column22".to_string(), Some(RawColumn::new("ID pohybu", id))),
    ])
}

#[derive(Default)]
pub struct FakeFeed {
    records: Vec<RawTransaction>,
    failing: bool,
    requests: RefCell<Vec<(NaiveDate, NaiveDate)>>,
}

impl FakeFeed {
    pub fn with_records(records: Vec<RawTransaction>) -> Self {
        FakeFeed {
            records,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        FakeFeed {
            failing: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.requests.borrow().clone()
    }
}

impl BankFeed for FakeFeed {
    fn fetch_transactions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawTransaction>, SyncError> {
        self.requests.borrow_mut().push((start, end));
        if self.failing {
            return Err(SyncError::feed_fetch("connection refused"));
        }
        Ok(self.records.clone())
    }
}

/// Billing system answering queries by the filter's last value
#[derive(Default)]
pub struct FakeBilling {
    clients: HashMap<String, Vec<ClientRecord>>,
    invoices: HashMap<String, Vec<InvoiceRecord>>,
    rejected: Option<String>,
    failing_queries: bool,
    client_queries: RefCell<Vec<QueryFilter>>,
    invoice_queries: RefCell<Vec<QueryFilter>>,
    posted: RefCell<Vec<Payment>>,
}

impl FakeBilling {
    pub fn with_client(mut self, reference: &str, client: ClientRecord) -> Self {
        self.clients
            .entry(reference.to_string())
            .or_default()
            .push(client);
        self
    }

    pub fn with_invoice(mut self, reference: &str, invoice: InvoiceRecord) -> Self {
        self.invoices
            .entry(reference.to_string())
            .or_default()
            .push(invoice);
        self
    }

    /// Reject the payment for the given transaction id
    pub fn rejecting(mut self, transaction_id: &str) -> Self {
        self.rejected = Some(transaction_id.to_string());
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.failing_queries = true;
        self
    }

    pub fn client_queries(&self) -> Vec<QueryFilter> {
        self.client_queries.borrow().clone()
    }

    pub fn invoice_queries(&self) -> Vec<QueryFilter> {
        self.invoice_queries.borrow().clone()
    }

    pub fn posted(&self) -> Vec<Payment> {
        self.posted.borrow().clone()
    }

    pub fn posted_ids(&self) -> Vec<String> {
        self.posted
            .borrow()
            .iter()
            .map(|p| p.provider_payment_id.clone())
            .collect()
    }

    fn lookup_key(filter: &QueryFilter) -> String {
        filter
            .last()
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }
}

impl BillingApi for FakeBilling {
    fn query_clients(&self, filter: &QueryFilter) -> Result<Vec<ClientRecord>, SyncError> {
        self.client_queries.borrow_mut().push(filter.clone());
        if self.failing_queries {
            return Err(SyncError::billing_query("HTTP 500"));
        }
        Ok(self
            .clients
            .get(&Self::lookup_key(filter))
            .cloned()
            .unwrap_or_default())
    }

    fn query_invoices(&self, filter: &QueryFilter) -> Result<Vec<InvoiceRecord>, SyncError> {
        self.invoice_queries.borrow_mut().push(filter.clone());
        if self.failing_queries {
            return Err(SyncError::billing_query("HTTP 500"));
        }
        Ok(self
            .invoices
            .get(&Self::lookup_key(filter))
            .cloned()
            .unwrap_or_default())
    }

    fn create_payment(&self, payment: &Payment) -> Result<(), SyncError> {
        if self.rejected.as_deref() == Some(payment.provider_payment_id.as_str()) {
            return Err(SyncError::posting(
                &payment.provider_payment_id,
                "HTTP 422 Unprocessable Entity",
            ));
        }
        self.posted.borrow_mut().push(payment.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCheckpointStore {
    current: Option<Checkpoint>,
    history: Vec<Checkpoint>,
}

impl MemoryCheckpointStore {
    pub fn with(checkpoint: Checkpoint) -> Self {
        MemoryCheckpointStore {
            current: Some(checkpoint),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<Checkpoint> {
        self.current.clone()
    }

    /// Every checkpoint saved, oldest first
    pub fn history(&self) -> &[Checkpoint] {
        &self.history
    }

    pub fn saves(&self) -> usize {
        self.history.len()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self) -> Result<Option<Checkpoint>, SyncError> {
        Ok(self.current.clone())
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), SyncError> {
        self.current = Some(checkpoint.clone());
        self.history.push(checkpoint.clone());
        Ok(())
    }
}
