use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::dto::{DesjardinsRow, PARSER_NAME};
use super::types::infer_statement_year;
use crate::document;
use crate::errors::StatementResult;
use crate::parsers::traits::{Grammar, file_name_of, is_statement_document};
use crate::types::{FileExtraction, FileSniff};

static TX_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<tx>\d{2} \d{2})\s+(?P<posted>\d{2} \d{2})\s+(?P<rest>.+)$")
        .expect("transaction line regex")
});
static AMOUNT_TRAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<amount>(?:-?\d[\d\s]*,\d{2}(?:CR)?|-?\d[\d\s]*CR|\(\d[\d\s]*,\d{2}\)))\s*$")
        .expect("trailing amount regex")
});
static PERCENT_TRAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d+,\d{2}\s*%$").expect("percent regex"));
static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace regex"));

/// Extratos de cartão de crédito Desjardins.
///
/// As linhas têm a forma `01 06 02 06 ZEHRS #529 WINDSOR ON 3,00 % 90,45`:
/// data da transação, data de inscrição, descrição, taxa opcional, valor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesjardinsParser;

impl DesjardinsParser {
    pub fn new() -> Self {
        Self
    }

    /// Converte páginas já extraídas em transações.
    pub fn parse_pages(&self, pages: &[String], sniff: &FileSniff, filename: &str) -> FileExtraction {
        let first_page = pages
            .first()
            .map(String::as_str)
            .or(sniff.first_page_text.as_deref());
        let year = infer_statement_year(first_page, filename);

        let mut extraction = FileExtraction::default();
        for row in pages.iter().flat_map(|page| parse_page_rows(page)) {
            match row.into_transaction(year, filename) {
                Ok(txn) => extraction.transactions.push(txn),
                Err(err) => {
                    log::debug!("{filename}: dropped row: {err}");
                    extraction.skipped_rows += 1;
                }
            }
        }

        extraction
    }
}

impl Grammar for DesjardinsParser {
    fn name(&self) -> &'static str {
        PARSER_NAME
    }

    fn can_parse(&self, _path: &Path, sniff: &FileSniff) -> bool {
        if !is_statement_document(sniff) {
            return false;
        }

        let Some(text) = sniff.upper_text() else {
            return false;
        };
        text.contains("DATE DU RELE") && text.contains("DESJARDINS")
    }

    fn parse_file(&self, path: &Path, sniff: &FileSniff) -> StatementResult<FileExtraction> {
        let pages = document::read_pages(path)?;
        Ok(self.parse_pages(&pages, sniff, &file_name_of(path)))
    }
}

/// Linhas candidatas de uma página. Linhas sem duas datas no início e um
/// valor no fim não são transações e são ignoradas em silêncio.
pub fn parse_page_rows(text: &str) -> Vec<DesjardinsRow> {
    text.lines().filter_map(|line| parse_row(line.trim())).collect()
}

fn parse_row(line: &str) -> Option<DesjardinsRow> {
    let caps = TX_LINE_RE.captures(line)?;
    let rest = &caps["rest"];

    let amount = AMOUNT_TRAIL_RE.captures(rest)?;
    let amount_match = amount.name("amount")?;

    // strip the rate before the amount, never across it
    let description_raw = rest[..amount_match.start()].trim_end();
    let without_rate = PERCENT_TRAIL_RE.replace(description_raw, "");
    let description = MULTI_SPACE_RE.replace_all(without_rate.trim_end(), " ");

    Some(DesjardinsRow {
        transaction_date_raw: caps["tx"].to_string(),
        posted_date_raw: caps["posted"].to_string(),
        description_raw: description_raw.to_string(),
        description: description.into_owned(),
        amount_raw: amount_match.as_str().to_string(),
    })
}
