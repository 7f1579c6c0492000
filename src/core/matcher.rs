//! Client/invoice matching
//!
//! Resolves a transaction's payer reference to a billing-system client (and
//! possibly an invoice) using the configured [`MatchStrategy`]. Only a single
//! unambiguous hit counts as a match.

use crate::core::traits::{BillingApi, QueryFilter};
use crate::types::{MatchResult, SyncError, Transaction};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How a transaction reference is looked up in the billing system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Reference is an invoice number; yields the invoice and its client
    InvoiceNumber,
    /// Reference is a billing-system client id
    ClientId,
    /// Reference is a client's user identifier
    ClientUserIdent,
    /// Reference is the value of the named custom client attribute
    CustomAttribute(String),
}

impl FromStr for MatchStrategy {
    type Err = Infallible;

    /// Any selector that is not a built-in strategy names a custom attribute
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "invoiceNumber" => MatchStrategy::InvoiceNumber,
            "clientId" => MatchStrategy::ClientId,
            "clientUserIdent" => MatchStrategy::ClientUserIdent,
            key => MatchStrategy::CustomAttribute(key.to_string()),
        })
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::InvoiceNumber => f.write_str("invoiceNumber"),
            MatchStrategy::ClientId => f.write_str("clientId"),
            MatchStrategy::ClientUserIdent => f.write_str("clientUserIdent"),
            MatchStrategy::CustomAttribute(key) => f.write_str(key),
        }
    }
}

impl MatchStrategy {
    /// Equality filter for looking up `reference` with this strategy
    pub fn filter(&self, reference: &str) -> QueryFilter {
        match self {
            MatchStrategy::InvoiceNumber => vec![("number", reference.to_string())],
            MatchStrategy::ClientId => vec![("id", reference.to_string())],
            MatchStrategy::ClientUserIdent => vec![("userIdent", reference.to_string())],
            MatchStrategy::CustomAttribute(key) => vec![
                ("customAttributeKey", key.clone()),
                ("customAttributeValue", reference.to_string()),
            ],
        }
    }
}

/// Matches transactions against a billing system
pub struct ClientMatcher<'a, B: BillingApi + ?Sized> {
    billing: &'a B,
    strategy: &'a MatchStrategy,
}

impl<'a, B: BillingApi + ?Sized> ClientMatcher<'a, B> {
    pub fn new(billing: &'a B, strategy: &'a MatchStrategy) -> Self {
        ClientMatcher { billing, strategy }
    }

    /// Resolve the transaction's reference
    ///
    /// # Returns
    ///
    /// * `Ok(MatchResult)` - exactly one billing record matched
    /// * `Err(SyncError)` - soft errors ([`SyncError::is_soft`]) for no
    ///   reference, no hit or several hits; [`SyncError::BillingQuery`] when
    ///   the billing system could not be queried
    pub fn resolve(&self, tx: &Transaction) -> Result<MatchResult, SyncError> {
        let reference = tx
            .reference
            .as_deref()
            .ok_or_else(|| SyncError::missing_reference(&tx.id))?;
        let filter = self.strategy.filter(reference);

        match self.strategy {
            MatchStrategy::InvoiceNumber => {
                let invoices = self.billing.query_invoices(&filter)?;
                let invoice = self.single(tx, invoices)?;
                Ok(MatchResult::invoice(invoice.client_id, invoice.id))
            }
            _ => {
                let clients = self.billing.query_clients(&filter)?;
                let client = self.single(tx, clients)?;
                Ok(MatchResult::client(client.id))
            }
        }
    }

    /// Cardinality policy: zero or several results are both "no match"
    fn single<T>(&self, tx: &Transaction, mut results: Vec<T>) -> Result<T, SyncError> {
        match results.len() {
            0 => Err(SyncError::no_match(&tx.id, &self.strategy.to_string())),
            1 => Ok(results.remove(0)),
            count => Err(SyncError::ambiguous_match(&tx.id, count)),
        }
    }
}
