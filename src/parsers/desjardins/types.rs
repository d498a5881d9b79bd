use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::RowError;

static HEADER_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DATE DU RELEV[ÉE].*?Ann[ée]e\s+(\d{4})").expect("header year regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Ann[ée]e\s+(\d{4})").expect("year regex"));
static FILENAME_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("filename year regex"));

/// Representa um token de data `DD MM` de um extrato Desjardins.
///
/// O token não carrega o ano: ele é resolvido uma única vez por arquivo
/// (ver [`infer_statement_year`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMonth(String);

impl DayMonth {
    /// Combina o token com o ano do extrato.
    pub fn with_year(&self, year: i32) -> Result<NaiveDate, RowError> {
        let invalid = || RowError::InvalidDate(self.0.clone());

        let parts: Vec<&str> = self.0.split_whitespace().collect();
        let [day, month] = parts.as_slice() else {
            return Err(invalid());
        };
        if !is_ascii_number(day) || !is_ascii_number(month) {
            return Err(invalid());
        }

        let day: u32 = day.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    }
}

impl From<&str> for DayMonth {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn is_ascii_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Token de valor no fim da linha: `1 234,56`, `12,34CR`, `(45,67)` ou `-9,99`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountToken(String);

impl AmountToken {
    /// Valor com sinal; `CR`, um menos inicial ou parênteses indicam crédito.
    pub fn signed(&self) -> Result<Decimal, RowError> {
        let invalid = || RowError::InvalidAmount(self.0.clone());

        let mut rest = self.0.trim();
        let mut negative = false;

        if let Some(stripped) = rest.strip_suffix("CR") {
            negative = true;
            rest = stripped;
        }
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        }
        if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            negative = true;
            rest = inner;
        }

        let mut clean: String = rest
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .collect();
        if clean.matches(',').count() == 1 && !clean.contains('.') {
            clean = clean.replace(',', ".");
        }

        let magnitude = Decimal::from_str(&clean).map_err(|_| invalid())?;
        Ok(if negative { -magnitude } else { magnitude })
    }
}

impl From<&str> for AmountToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Ano compartilhado por todas as linhas de um extrato.
///
/// Prioridade: o cabeçalho da data do relevé, qualquer `Année YYYY` na
/// primeira página, o último grupo de 4 dígitos do nome do arquivo e, por
/// fim, o ano corrente.
pub fn infer_statement_year(first_page_text: Option<&str>, filename: &str) -> i32 {
    first_page_text
        .and_then(|text| year_from_header(text))
        .or_else(|| year_from_filename(filename))
        .unwrap_or_else(|| Local::now().year())
}

pub fn year_from_header(text: &str) -> Option<i32> {
    HEADER_YEAR_RE
        .captures(text)
        .or_else(|| YEAR_RE.captures(text))
        .and_then(|caps| caps[1].parse().ok())
}

pub fn year_from_filename(filename: &str) -> Option<i32> {
    FILENAME_YEAR_RE
        .find_iter(filename)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}
