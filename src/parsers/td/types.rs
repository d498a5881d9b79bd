use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::errors::RowError;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{3})\s*(\d{1,2})/(\d{2})-([A-Z]{3})\s*(\d{1,2})/(\d{2})")
        .expect("date range regex")
});
static FILENAME_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("filename year regex"));
static FILENAME_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Z])(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)(?:[^A-Z]|$)")
        .expect("filename month regex")
});

/// `JAN` -> 1 ... `DEC` -> 12.
pub fn month_from_abbr(abbr: &str) -> Option<u32> {
    let upper = abbr.to_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|idx| idx as u32 + 1)
}

/// Uma ponta do período do extrato, guardada como números porque o dia do
/// cabeçalho nem sempre é uma data válida sozinho (`FEB30/25`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodEndpoint {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PeriodEndpoint {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn as_ymd(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

/// Período do extrato impresso uma vez por documento, ex.: `OCT31/25-NOV28/25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementPeriod {
    pub start: PeriodEndpoint,
    pub end: PeriodEndpoint,
}

impl StatementPeriod {
    pub fn from_header(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        let caps = DATE_RANGE_RE.captures(&upper)?;

        let endpoint = |mon: usize, day: usize, year: usize| -> Option<PeriodEndpoint> {
            Some(PeriodEndpoint {
                year: 2000 + caps[year].parse::<i32>().ok()?,
                month: month_from_abbr(&caps[mon])?,
                day: caps[day].parse().ok()?,
            })
        };

        Some(Self {
            start: endpoint(1, 2, 3)?,
            end: endpoint(4, 5, 6)?,
        })
    }

    /// Janela de um mês deduzida do nome do arquivo quando falta o cabeçalho:
    /// primeiro `20YY` (senão o ano corrente), primeiro nome de mês (senão dezembro).
    pub fn fallback_from_filename(filename: &str) -> Self {
        let upper = filename.to_uppercase();
        let year = FILENAME_YEAR_RE
            .find(&upper)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or_else(|| Local::now().year());
        let month = FILENAME_MONTH_RE
            .captures(&upper)
            .and_then(|caps| month_from_abbr(&caps[1]))
            .unwrap_or(12);

        Self {
            start: PeriodEndpoint::new(year, month, 1),
            end: PeriodEndpoint::new(year, month, 28),
        }
    }

    /// Meses anteriores ao mês inicial pertencem ao ano final quando o
    /// período atravessa a virada do ano.
    pub fn year_for_month(&self, month: u32) -> i32 {
        if self.start.year == self.end.year || month >= self.start.month {
            self.start.year
        } else {
            self.end.year
        }
    }
}

/// Token `MON DD` embutido numa linha de transação, ex.: `NOV05`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDay(String);

impl MonthDay {
    pub fn resolve(&self, period: &StatementPeriod) -> Result<NaiveDate, RowError> {
        let invalid = || RowError::InvalidDate(self.0.clone());

        let compact: String = self.0.chars().filter(|c| !c.is_whitespace()).collect();
        let split = compact
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(idx, _)| idx)
            .ok_or_else(invalid)?;
        let (mon, day) = compact.split_at(split);

        let month = month_from_abbr(mon).ok_or_else(invalid)?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(period.year_for_month(month), month, day).ok_or_else(invalid)
    }
}

impl From<&str> for MonthDay {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
