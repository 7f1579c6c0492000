//! Billing-system side types
//!
//! Records returned by billing-system queries, the outcome of client
//! matching, and the payment payload submitted for every incoming
//! transaction.

use super::transaction::TransactionId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Billing-system client identifier
pub type ClientId = u64;

/// Billing-system invoice identifier
pub type InvoiceId = u64;

/// Client as returned by a billing-system client query
///
/// Only the identifier is needed; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
}

/// Invoice as returned by a billing-system invoice query
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub client_id: ClientId,
    #[serde(default)]
    pub number: Option<String>,
}

/// Result of resolving a transaction reference to a client/invoice
///
/// Both fields absent means "no match"; a client without an invoice and a
/// client with an invoice are both resolved states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub client_id: Option<ClientId>,
    pub invoice_id: Option<InvoiceId>,
}

impl MatchResult {
    pub fn unmatched() -> Self {
        MatchResult::default()
    }

    pub fn client(client_id: ClientId) -> Self {
        MatchResult {
            client_id: Some(client_id),
            invoice_id: None,
        }
    }

    pub fn invoice(client_id: ClientId, invoice_id: InvoiceId) -> Self {
        MatchResult {
            client_id: Some(client_id),
            invoice_id: Some(invoice_id),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.client_id.is_some()
    }
}

/// Payment method tag understood by the billing system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    BankTransfer,
}

impl PaymentMethod {
    /// Numeric code of the method in the billing API
    pub fn code(self) -> u8 {
        match self {
            PaymentMethod::BankTransfer => 3,
        }
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Payment payload submitted to the billing system
///
/// Built fresh for every transaction and never stored locally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub client_id: Option<ClientId>,
    pub method: PaymentMethod,

    /// Sent as a JSON number; exact for amounts with up to two decimals
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,

    /// `name: value` lines built from the raw feed columns
    pub note: String,

    /// Empty, or the single matched invoice
    pub invoice_ids: Vec<InvoiceId>,
    pub provider_name: String,

    /// Correlation id, always the bank transaction id
    pub provider_payment_id: TransactionId,

    /// `YYYY-MM-DDTHH:MM:SS+HHMM`
    pub provider_payment_time: String,

    /// True exactly when no invoice was matched
    pub apply_to_invoices_automatically: bool,
}

/// Record of a payment accepted by the billing system during a run
#[derive(Debug, Clone, PartialEq)]
pub struct PostedPayment {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub client_id: Option<ClientId>,
    pub invoice_id: Option<InvoiceId>,
}
