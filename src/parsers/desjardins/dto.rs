use serde::{Deserialize, Serialize};

use super::types::{AmountToken, DayMonth};
use crate::errors::RowError;
use crate::types::Transaction;

pub const PARSER_NAME: &str = "desjardins";

const PAYMENT_PREFIX: &str = "PAIEMENT CAISSE";

/// Linha de transação como aparece na página, antes de qualquer validação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesjardinsRow {
    pub transaction_date_raw: String,
    pub posted_date_raw: String,
    pub description_raw: String,
    pub description: String,
    pub amount_raw: String,
}

impl DesjardinsRow {
    pub fn into_transaction(self, year: i32, source_file: &str) -> Result<Transaction, RowError> {
        let transaction_date = DayMonth::from(self.transaction_date_raw.as_str()).with_year(year)?;
        let posted_date = DayMonth::from(self.posted_date_raw.as_str()).with_year(year)?;
        if posted_date < transaction_date {
            return Err(RowError::PostedBeforeTransaction {
                transaction: self.transaction_date_raw,
                posted: self.posted_date_raw,
            });
        }

        let amount = AmountToken::from(self.amount_raw.as_str()).signed()?;

        if self.description.trim().is_empty() {
            return Err(RowError::EmptyDescription);
        }
        let is_payment = self.description.to_uppercase().starts_with(PAYMENT_PREFIX);

        Ok(Transaction {
            source_file: source_file.to_string(),
            transaction_date,
            posted_date: Some(posted_date),
            transaction_date_raw: Some(self.transaction_date_raw),
            posted_date_raw: Some(self.posted_date_raw),
            description: self.description,
            description_raw: self.description_raw,
            amount,
            is_payment,
            parser: PARSER_NAME.to_string(),
        })
    }
}
