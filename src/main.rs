//! Bank payment sync CLI
//!
//! Imports incoming bank transactions from the Fio statement API into UCRM as
//! payments. Meant to be run periodically by a scheduler.
//!
//! # Usage
//!
//! ```bash
//! # everything from the environment / .env
//! bank-payment-sync
//! bank-payment-sync --match-by clientId --report > imported.csv
//! ```
//!
//! # Operational precondition
//!
//! Runs must never overlap against the same state file; the scheduler is
//! responsible for that. A killed run can simply be started again.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (feed unreachable, malformed record, checkpoint inconsistency,
//!   posting failure, ...)

use bank_payment_sync::cli;
use bank_payment_sync::core::SyncEngine;
use bank_payment_sync::io::{write_payments_csv, FileCheckpointStore, FioClient, UcrmClient};
use bank_payment_sync::types::SyncError;
use chrono::Local;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), SyncError> {
    let feed = FioClient::new(&args.fio_url, &args.fio_token, args.http_timeout())?;
    let billing = UcrmClient::new(
        &args.ucrm_url,
        &args.ucrm_api_version,
        &args.ucrm_key,
        args.http_timeout(),
    )?;
    let checkpoints = FileCheckpointStore::new(&args.state_file);

    let mut engine = SyncEngine::new(feed, billing, checkpoints, args.to_sync_config());
    let summary = engine.run(Local::now().date_naive())?;

    if args.report {
        let mut output = std::io::stdout();
        write_payments_csv(&summary.posted, &mut output).map_err(SyncError::report)?;
    }

    Ok(())
}
