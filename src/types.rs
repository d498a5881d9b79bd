use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Linha canônica do ledger produzida por toda gramática.
///
/// A ordem dos campos é a ordem das colunas do CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "file")]
    pub source_file: String,
    pub transaction_date: NaiveDate,
    pub posted_date: Option<NaiveDate>,
    pub transaction_date_raw: Option<String>,
    pub posted_date_raw: Option<String>,
    pub description: String,
    pub description_raw: String,
    /// Positivo é dinheiro gasto, negativo é dinheiro recebido.
    pub amount: Decimal,
    pub is_payment: bool,
    pub parser: String,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Espiada leve num arquivo, feita uma vez antes do despacho.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileSniff {
    /// Em minúsculas, com o ponto inicial (`.pdf`).
    pub extension: String,
    pub first_page_text: Option<String>,
}

impl FileSniff {
    pub fn new(extension: impl Into<String>, first_page_text: Option<String>) -> Self {
        Self {
            extension: extension.into(),
            first_page_text,
        }
    }

    /// Texto da primeira página em maiúsculas, para busca de marcadores.
    pub fn upper_text(&self) -> Option<String> {
        self.first_page_text.as_deref().map(str::to_uppercase)
    }
}

/// Linhas extraídas de um único arquivo.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub transactions: Vec<Transaction>,
    /// Linhas malformadas descartadas durante o parsing.
    pub skipped_rows: usize,
}
