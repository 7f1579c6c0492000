//! I/O module
//!
//! Adapters between the sync engine and the outside world.
//!
//! # Components
//!
//! - `checkpoint_file` - Checkpoint store backed by a text file
//! - `fio_client` - Bank statement feed over the Fio REST API
//! - `ucrm_client` - Billing system queries and payment posting over the UCRM API
//! - `csv_format` - CSV report of posted payments

pub mod checkpoint_file;
pub mod csv_format;
pub mod fio_client;
pub mod ucrm_client;

pub use checkpoint_file::FileCheckpointStore;
pub use csv_format::write_payments_csv;
pub use fio_client::{FioClient, DEFAULT_FIO_URL};
pub use ucrm_client::UcrmClient;
