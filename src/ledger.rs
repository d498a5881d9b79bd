//! Persistência do ledger em CSV.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{RowError, StatementParseError, StatementResult};
use crate::types::Transaction;

/// Ordem das colunas de todo arquivo de ledger.
pub const LEDGER_COLUMNS: [&str; 10] = [
    "file",
    "transaction_date",
    "posted_date",
    "transaction_date_raw",
    "posted_date_raw",
    "description",
    "description_raw",
    "amount",
    "is_payment",
    "parser",
];

/// Grava `ledger` em `path`, substituindo o arquivo só quando ele estiver completo.
pub fn write_csv(ledger: &[Transaction], path: &Path) -> StatementResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    let written = write_rows(ledger, &tmp_path)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(StatementParseError::from));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return written;
    }

    log::info!("Wrote {} transactions to {}", ledger.len(), path.display());
    Ok(())
}

fn write_rows(ledger: &[Transaction], tmp_path: &Path) -> StatementResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(tmp_path)?;
    writer.write_record(LEDGER_COLUMNS)?;
    for txn in ledger {
        writer.serialize(txn)?;
    }
    writer.flush()?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Linha crua do CSV; o valor fica como texto até a conversão.
#[derive(Debug, Deserialize)]
struct LedgerRow {
    file: String,
    transaction_date: NaiveDate,
    posted_date: Option<NaiveDate>,
    transaction_date_raw: Option<String>,
    posted_date_raw: Option<String>,
    description: String,
    description_raw: String,
    amount: String,
    is_payment: bool,
    parser: String,
}

impl TryFrom<LedgerRow> for Transaction {
    type Error = RowError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        let amount =
            Decimal::from_str(row.amount.trim()).map_err(|_| RowError::InvalidAmount(row.amount.clone()))?;

        Ok(Transaction {
            source_file: row.file,
            transaction_date: row.transaction_date,
            posted_date: row.posted_date,
            transaction_date_raw: row.transaction_date_raw,
            posted_date_raw: row.posted_date_raw,
            description: row.description,
            description_raw: row.description_raw,
            amount,
            is_payment: row.is_payment,
            parser: row.parser,
        })
    }
}

/// Relê um ledger gravado por [`write_csv`].
pub fn read_csv(path: &Path) -> StatementResult<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut transactions = Vec::new();
    for (idx, result) in reader.deserialize::<LedgerRow>().enumerate() {
        let txn = Transaction::try_from(result?)
            .map_err(|reason| StatementParseError::InvalidLedgerRow { row: idx + 1, reason })?;
        transactions.push(txn);
    }

    Ok(transactions)
}
