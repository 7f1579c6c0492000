//! Payment building and posting
//!
//! Every incoming transaction becomes exactly one billing-system payment.
//! The checkpoint only moves past a transaction once the billing system has
//! accepted its payment.

use crate::core::traits::{BillingApi, CheckpointStore};
use crate::types::{MatchResult, Payment, PaymentMethod, PostedPayment, SyncError, Transaction};
use tracing::info;

/// Timestamp format of `providerPaymentTime`
const PAYMENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Audit note: one `name: value` line per raw feed column, in feed order
pub fn build_note(tx: &Transaction) -> String {
    tx.raw_fields
        .iter()
        .map(|(name, value)| format!("{}: {}\n", name, value))
        .collect()
}

/// Build the payment payload for a transaction and its match outcome
///
/// Funds are left to the billing system's automatic invoice application
/// unless a specific invoice was matched.
pub fn build_payment(tx: &Transaction, matched: &MatchResult, provider_name: &str) -> Payment {
    Payment {
        client_id: matched.client_id,
        method: PaymentMethod::BankTransfer,
        amount: tx.amount,
        currency_code: tx.currency.clone(),
        note: build_note(tx),
        invoice_ids: matched.invoice_id.into_iter().collect(),
        provider_name: provider_name.to_string(),
        provider_payment_id: tx.id.clone(),
        provider_payment_time: tx.posted_at.format(PAYMENT_TIME_FORMAT).to_string(),
        apply_to_invoices_automatically: matched.invoice_id.is_none(),
    }
}

/// Submits payments and advances the checkpoint after each accepted one
pub struct PaymentPoster<'a, B: BillingApi + ?Sized, S: CheckpointStore + ?Sized> {
    billing: &'a B,
    checkpoints: &'a mut S,
    provider_name: &'a str,
}

impl<'a, B: BillingApi + ?Sized, S: CheckpointStore + ?Sized> PaymentPoster<'a, B, S> {
    pub fn new(billing: &'a B, checkpoints: &'a mut S, provider_name: &'a str) -> Self {
        PaymentPoster {
            billing,
            checkpoints,
            provider_name,
        }
    }

    /// Post one transaction
    ///
    /// On success the checkpoint becomes `(tx.date, tx.id)`. On
    /// failure nothing is saved and the error is returned.
    ///
    /// # Arguments
    ///
    /// * `tx` - The transaction being paid in
    /// * `matched` - Client/invoice association, possibly unmatched
    pub fn post(
        &mut self,
        tx: &Transaction,
        matched: &MatchResult,
    ) -> Result<PostedPayment, SyncError> {
        let payment = build_payment(tx, matched, self.provider_name);

        self.billing.create_payment(&payment)?;
        info!(
            transaction = %tx.id,
            client = ?matched.client_id,
            invoice = ?matched.invoice_id,
            amount = %tx.amount,
            currency = %tx.currency,
            "Payment posted"
        );

        self.checkpoints.save_progress(tx.date, &tx.id)?;

        Ok(PostedPayment {
            transaction_id: tx.id.clone(),
            date: tx.date,
            amount: tx.amount,
            currency: tx.currency.clone(),
            client_id: matched.client_id,
            invoice_id: matched.invoice_id,
        })
    }
}
