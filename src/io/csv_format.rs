//! CSV run report
//!
//! Serializes the payments posted during a run, one row per payment, for
//! operators who want a machine-readable record of what was imported.
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::PostedPayment;
use std::io::Write;

/// Write posted payments to CSV format
///
/// Writes payments in posting order with columns:
/// transaction, date, amount, currency, client, invoice.
/// Missing client or invoice associations are written as empty fields.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_payments_csv(payments: &[PostedPayment], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["transaction", "date", "amount", "currency", "client", "invoice"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for payment in payments {
        writer
            .write_record(&[
                payment.transaction_id.clone(),
                payment.date.to_string(),
                payment.amount.to_string(),
                payment.currency.clone(),
                payment.client_id.map(|id| id.to_string()).unwrap_or_default(),
                payment.invoice_id.map(|id| id.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write payment record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
