use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{MonthDay, StatementPeriod};
use crate::errors::RowError;
use crate::types::Transaction;

pub const PARSER_NAME: &str = "td";

const PAYMENT_MARKER: &str = "PAYMENT";

/// Linha candidata separada em colunas, antes da validação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdRow {
    pub date_raw: String,
    pub description_tokens: Vec<String>,
    /// Tokens de valor antes da data: `[valor]` ou `[saque, depósito]`.
    pub amount_tokens: Vec<String>,
}

impl TdRow {
    pub fn into_transaction(
        self,
        period: &StatementPeriod,
        source_file: &str,
    ) -> Result<Transaction, RowError> {
        let transaction_date = MonthDay::from(self.date_raw.as_str()).resolve(period)?;

        let description_raw = self.description_tokens.join(" ");
        let description = description_raw.trim().to_string();
        if description.is_empty() {
            return Err(RowError::EmptyDescription);
        }

        let amount = self.signed_amount()?;
        let is_payment = description.to_uppercase().contains(PAYMENT_MARKER);

        Ok(Transaction {
            source_file: source_file.to_string(),
            transaction_date,
            posted_date: None,
            transaction_date_raw: Some(self.date_raw),
            posted_date_raw: None,
            description,
            description_raw,
            amount,
            is_payment,
            parser: PARSER_NAME.to_string(),
        })
    }

    /// Um depósito diferente de zero vence e vira dinheiro recebido; senão o
    /// saque (ou a única coluna) é o gasto.
    fn signed_amount(&self) -> Result<Decimal, RowError> {
        let amounts = self
            .amount_tokens
            .iter()
            .map(|raw| normalize_amount(raw))
            .collect::<Result<Vec<_>, _>>()?;

        match amounts.as_slice() {
            [] => Err(RowError::MissingAmount),
            [single] => Ok(*single),
            [withdrawal, deposit, ..] => {
                if deposit.is_zero() {
                    Ok(*withdrawal)
                } else {
                    Ok(-*deposit)
                }
            }
        }
    }
}

/// `10,000.00` -> `10000.00`.
pub fn normalize_amount(raw: &str) -> Result<Decimal, RowError> {
    Decimal::from_str(&raw.replace(',', "")).map_err(|_| RowError::InvalidAmount(raw.to_string()))
}
