//! Extrai um ledger de gastos com sinal de extratos Desjardins e TD.
//!
//! ```rust,ignore
//! use statement_ledger::{DEFAULT_TOLERANCE, ExtractionBuilder, reconcile, write_csv};
//!
//! let extraction = ExtractionBuilder::new()
//!     .input_dir("statements/")
//!     .pattern("*.pdf")
//!     .extract()?;
//!
//! let cleaned = reconcile(extraction.transactions, DEFAULT_TOLERANCE);
//! write_csv(&cleaned.transactions, "ledger.csv".as_ref())?;
//! ```

mod builder;
mod types;

pub mod config;
pub mod dispatch;
pub mod document;
pub mod errors;
pub mod filter;
pub mod ledger;
pub mod parsers;
pub mod reconcile;

pub use builder::{Bank, ExtractionBuilder};
pub use config::{UserSettings, default_config_candidates, load_user_settings};
pub use dispatch::Extraction;
pub use filter::{DescriptionFilter, IgnorePatterns};
pub use ledger::{read_csv, write_csv};
pub use parsers::prelude::*;
pub use reconcile::{DEFAULT_TOLERANCE, Reconciliation, reconcile};
pub use types::{FileExtraction, FileSniff, Transaction};
