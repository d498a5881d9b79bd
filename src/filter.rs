//! Lista de descrições descartadas do ledger depois da extração.

use std::collections::HashSet;

use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};

use crate::config::UserSettings;
use crate::types::Transaction;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Padrões glob e regex crus, sem duplicatas (ignorando maiúsculas).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePatterns {
    pub glob: Vec<String>,
    pub regex: Vec<String>,
}

impl IgnorePatterns {
    /// Padrões da configuração primeiro, depois os globs extras da linha de comando.
    pub fn collect(settings: &UserSettings, cli_globs: &[String]) -> Self {
        let globs = settings.ignore_descriptions.iter().chain(cli_globs);
        Self {
            glob: dedupe(globs),
            regex: dedupe(settings.ignore_descriptions_regex.iter()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glob.is_empty() && self.regex.is_empty()
    }
}

fn dedupe<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_uppercase()))
        .cloned()
        .collect()
}

/// Forma compilada de [`IgnorePatterns`]. Regex inválidas são ignoradas.
#[derive(Debug, Clone, Default)]
pub struct DescriptionFilter {
    globs: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl DescriptionFilter {
    pub fn new(patterns: &IgnorePatterns) -> Self {
        let globs = patterns
            .glob
            .iter()
            .filter_map(|raw| compile_glob(raw))
            .collect();

        let regexes = patterns
            .regex
            .iter()
            .filter_map(|raw| match RegexBuilder::new(raw).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("ignoring invalid regex '{raw}': {e}");
                    None
                }
            })
            .collect();

        Self { globs, regexes }
    }

    pub fn matches(&self, description: &str) -> bool {
        self.globs
            .iter()
            .any(|pattern| pattern.matches_with(description, MATCH_OPTIONS))
            || self.regexes.iter().any(|re| re.is_match(description))
    }

    /// Descarta as linhas cuja descrição casa com algum padrão.
    pub fn filter(&self, ledger: Vec<Transaction>) -> (Vec<Transaction>, usize) {
        if self.globs.is_empty() && self.regexes.is_empty() {
            return (ledger, 0);
        }

        let before = ledger.len();
        let kept: Vec<Transaction> = ledger
            .into_iter()
            .filter(|txn| !self.matches(&txn.description))
            .collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }
}

/// Um `[` sem fechamento vira literal, como no `fnmatch`; os curingas
/// `*` e `?` continuam valendo.
fn compile_glob(raw: &str) -> Option<Pattern> {
    let collapsed = collapse_stars(raw);
    Pattern::new(&collapsed)
        .or_else(|_| Pattern::new(&literal_brackets(&collapsed)))
        .map_err(|e| log::warn!("ignoring invalid glob '{raw}': {e}"))
        .ok()
}

fn literal_brackets(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '[' => out.push_str("[[]"),
            ']' => out.push_str("[]]"),
            other => out.push(other),
        }
    }
    out
}

/// No crate `glob`, `**` casa componentes de caminho; descrições não têm
/// componentes, então qualquer sequência de asteriscos vale um `*`.
fn collapse_stars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn txn(description: &str, amount: i64) -> Transaction {
        Transaction {
            source_file: "td.pdf".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            posted_date: None,
            transaction_date_raw: None,
            posted_date_raw: None,
            description: description.to_string(),
            description_raw: description.to_string(),
            amount: Decimal::from(amount),
            is_payment: false,
            parser: "td".to_string(),
        }
    }

    fn patterns(glob: &[&str], regex: &[&str]) -> IgnorePatterns {
        IgnorePatterns {
            glob: glob.iter().map(|s| s.to_string()).collect(),
            regex: regex.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_collect_merges_and_dedupes() {
        let settings = UserSettings {
            ignore_descriptions: vec!["SEND E-TFR*".to_string(), String::new()],
            ignore_descriptions_regex: vec!["^ATM".to_string(), "^atm".to_string()],
        };
        let cli = vec!["send e-tfr*".to_string(), "INTEREST*".to_string()];

        let collected = IgnorePatterns::collect(&settings, &cli);
        assert_eq!(collected.glob, vec!["SEND E-TFR*", "INTEREST*"]);
        assert_eq!(collected.regex, vec!["^ATM"]);
    }

    #[test]
    fn test_filter_transactions_by_description() {
        let ledger = vec![txn("SENDE-TFR***vDb", 100), txn("GROCERY STORE", 50)];
        let filter = DescriptionFilter::new(&patterns(&["SENDE-TFR***vDb"], &[]));

        let (filtered, dropped) = filter.filter(ledger);
        assert_eq!(dropped, 1);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].description, "GROCERY STORE");
    }

    #[test]
    fn test_filter_transactions_by_regex() {
        let ledger = vec![txn("SENDE-TFR***ABC", 100), txn("Other", 10)];
        let filter = DescriptionFilter::new(&patterns(&[], &["^sende-tfr"]));

        let (filtered, dropped) = filter.filter(ledger);
        assert_eq!(dropped, 1);
        assert_eq!(filtered[0].description, "Other");
    }

    #[rstest]
    #[case("netflix*", "NETFLIX.COM 866-579", true)]
    #[case("*uber*", "UBER* EATS / TORONTO", true)]
    #[case("TIM HORTONS #?", "TIM HORTONS #1", true)]
    #[case("TIM HORTONS #?", "TIM HORTONS #12", false)]
    #[case("[!A]*", "BANK FEE", true)]
    fn test_glob_semantics(#[case] glob: &str, #[case] description: &str, #[case] expected: bool) {
        let filter = DescriptionFilter::new(&patterns(&[glob], &[]));
        assert_eq!(filter.matches(description), expected);
    }

    #[test]
    fn test_invalid_regex_is_skipped() {
        let filter = DescriptionFilter::new(&patterns(&[], &["(unclosed"]));
        let (filtered, dropped) = filter.filter(vec![txn("(unclosed", 1)]);
        assert_eq!(dropped, 0);
        assert_eq!(filtered.len(), 1);
    }

    #[rstest]
    #[case("[unclosed", "[UNCLOSED", true)]
    #[case("[unclosed*", "[unclosed store 42", true)]
    #[case("[unclosed", "unclosed", false)]
    #[case("a]b[c", "A]B[C", true)]
    fn test_unclosed_bracket_is_literal(
        #[case] glob: &str,
        #[case] description: &str,
        #[case] expected: bool,
    ) {
        let filter = DescriptionFilter::new(&patterns(&[glob], &[]));
        assert_eq!(filter.matches(description), expected);
    }

    #[test]
    fn test_empty_patterns_is_noop() {
        assert!(IgnorePatterns::default().is_empty());
        let (filtered, dropped) = DescriptionFilter::default().filter(vec![txn("ANY", 1)]);
        assert_eq!(dropped, 0);
        assert_eq!(filtered.len(), 1);
    }

    #[rstest]
    #[case("A***B", "A*B")]
    #[case("**", "*")]
    #[case("a*b*c", "a*b*c")]
    fn test_collapse_stars(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(collapse_stars(raw), expected);
    }
}
