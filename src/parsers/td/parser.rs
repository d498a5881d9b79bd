use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::dto::{PARSER_NAME, TdRow};
use super::types::StatementPeriod;
use crate::document;
use crate::errors::StatementResult;
use crate::parsers::traits::{Grammar, file_name_of, is_statement_document};
use crate::types::{FileExtraction, FileSniff};

static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<mon>JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s?(?P<day>\d{1,2})")
        .expect("date token regex")
});
static AMOUNT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:,\d+)*\.\d{2}$").expect("amount token regex"));

const EXCLUDED_PREFIXES: [&str; 2] = ["STARTING", "CLOSING"];

/// Extratos de conta corrente TD.
///
/// As linhas têm a forma `PAYROLL CO 0.00 1,234.56 NOV05 300,000.00`:
/// descrição, colunas de saque e depósito, data, saldo corrente.
#[derive(Debug, Clone, Copy, Default)]
pub struct TdParser;

impl TdParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_pages(&self, pages: &[String], sniff: &FileSniff, filename: &str) -> FileExtraction {
        let first_page = pages
            .first()
            .map(String::as_str)
            .or(sniff.first_page_text.as_deref())
            .unwrap_or_default();

        let period = StatementPeriod::from_header(first_page).unwrap_or_else(|| {
            let fallback = StatementPeriod::fallback_from_filename(filename);
            log::warn!(
                "{filename}: statement period not found, assuming {}-{:02}",
                fallback.start.year,
                fallback.start.month
            );
            fallback
        });

        let mut extraction = FileExtraction::default();
        let rows = pages.iter().flat_map(|page| page.lines()).filter_map(parse_line);
        for row in rows {
            match row.into_transaction(&period, filename) {
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

impl Grammar for TdParser {
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
        let has_brand =
            text.contains("THETORONTO-DOMINIONBANK") || text.contains("TORONTO-DOMINION BANK");
        let has_statement =
            text.contains("STATEMENT OFACCOUNT") || text.contains("STATEMENT OF ACCOUNT");
        let has_branch = text.contains("BRANCHNO.") || text.contains("BRANCH NO.");
        has_brand && has_statement && has_branch
    }

    fn parse_file(&self, path: &Path, sniff: &FileSniff) -> StatementResult<FileExtraction> {
        let pages = document::read_pages(path)?;
        Ok(self.parse_pages(&pages, sniff, &file_name_of(path)))
    }
}

/// Separa uma linha nas colunas de data, descrição e valor.
///
/// Retorna `None` para linhas que não são transações: sem data embutida,
/// sem valor antes da data, ou linha de saldo.
pub fn parse_line(line: &str) -> Option<TdRow> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let upper = line.to_uppercase();
    if EXCLUDED_PREFIXES.iter().any(|prefix| upper.starts_with(prefix)) {
        return None;
    }

    let caps = DATE_TOKEN_RE.captures(&upper)?;
    let (mon, day) = (&caps["mon"], &caps["day"]);

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let date_idx = date_token_index(&tokens, mon, day)?;

    let (description_tokens, amount_tokens) = split_amounts(&tokens[..date_idx]);
    if amount_tokens.is_empty() {
        return None;
    }

    Some(TdRow {
        date_raw: format!("{mon}{day}"),
        description_tokens: description_tokens.iter().map(|s| s.to_string()).collect(),
        amount_tokens: amount_tokens.iter().map(|s| s.to_string()).collect(),
    })
}

/// Token que contém a data, colada (`NOV05`) ou separada (`NOV` `05`).
fn date_token_index(tokens: &[&str], mon: &str, day: &str) -> Option<usize> {
    let compact = format!("{mon}{day}");
    tokens
        .iter()
        .position(|tok| tok.to_uppercase().contains(&compact))
        .or_else(|| {
            tokens.windows(2).position(|pair| {
                pair[0].to_uppercase().ends_with(mon) && pair[1].starts_with(day)
            })
        })
}

/// Sequência final de tokens com forma de valor, achada varrendo de trás para frente.
pub fn split_amounts<'a>(tokens: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    let amount_count = tokens
        .iter()
        .rev()
        .take_while(|tok| AMOUNT_TOKEN_RE.is_match(tok))
        .count();
    let (description, amounts) = tokens.split_at(tokens.len() - amount_count);
    (description.to_vec(), amounts.to_vec())
}
