use crate::core::{MatchStrategy, SyncConfig};
use crate::io::DEFAULT_FIO_URL;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Import incoming bank transactions into the billing system as payments
///
/// Every option can also be supplied through the environment (or a `.env`
/// file), so a scheduled run needs no arguments at all.
#[derive(Parser, Debug)]
#[command(name = "bank-payment-sync")]
#[command(
    about = "Import incoming bank transactions into the billing system as payments",
    long_about = None
)]
pub struct CliArgs {
    /// Fio API token of the account being imported
    #[arg(long = "fio-token", env = "FIO_CZ_API_TOKEN", hide_env_values = true)]
    pub fio_token: String,

    /// Base URL of the Fio REST API
    #[arg(long = "fio-url", env = "FIO_CZ_API_URL", default_value = DEFAULT_FIO_URL)]
    pub fio_url: String,

    /// Earliest posting date to import (YYYY-MM-DD)
    #[arg(long = "start-date", env = "FIO_CZ_START_DATE", value_name = "DATE")]
    pub start_date: NaiveDate,

    /// File holding the sync checkpoint
    #[arg(
        long = "state-file",
        env = "FIO_CZ_SAVE_FILE",
        value_name = "PATH",
        default_value = "fio_cz_last_payment.txt"
    )]
    pub state_file: PathBuf,

    /// Base URL of the UCRM instance
    #[arg(long = "ucrm-url", env = "UCRM_API_URL")]
    pub ucrm_url: String,

    /// UCRM API version
    #[arg(long = "ucrm-api-version", env = "UCRM_API_VERSION", default_value = "1.0")]
    pub ucrm_api_version: String,

    /// UCRM app key with write access to payments
    #[arg(long = "ucrm-key", env = "UCRM_API_KEY", hide_env_values = true)]
    pub ucrm_key: String,

    /// How references are matched: invoiceNumber, clientId, clientUserIdent
    /// or the key of a custom client attribute
    #[arg(
        long = "match-by",
        env = "PAYMENT_MATCH_ATTRIBUTE",
        value_name = "STRATEGY",
        default_value = "invoiceNumber"
    )]
    pub match_by: MatchStrategy,

    /// Provider name reported with every payment
    #[arg(long = "provider-name", env = "PAYMENT_PROVIDER_NAME", default_value = "Fio CZ")]
    pub provider_name: String,

    /// Timeout of every HTTP request, in seconds
    #[arg(
        long = "http-timeout",
        env = "HTTP_TIMEOUT_SECS",
        value_name = "SECONDS",
        default_value_t = 30
    )]
    pub http_timeout_secs: u64,

    /// Write a CSV report of posted payments to stdout
    #[arg(long = "report")]
    pub report: bool,
}

impl CliArgs {
    /// Engine settings carried by these arguments
    pub fn to_sync_config(&self) -> SyncConfig {
        SyncConfig {
            start_date: self.start_date,
            match_strategy: self.match_by.clone(),
            provider_name: self.provider_name.clone(),
        }
    }

    /// Timeout applied to both HTTP clients; zero falls back to the default
    pub fn http_timeout(&self) -> Duration {
        match self.http_timeout_secs {
            0 => Duration::from_secs(30),
            secs => Duration::from_secs(secs),
        }
    }
}
