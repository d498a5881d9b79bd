use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dispatch::{self, Extraction};
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::prelude::*;
use crate::types::{FileExtraction, FileSniff};

/// Todas as instituições suportadas. O registro é fechado: detectar
/// ambiguidade exige o conjunto completo de candidatos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    #[serde(rename = "desjardins")]
    Desjardins,
    #[serde(rename = "td")]
    Td,
}

impl Bank {
    pub const ALL: [Bank; 2] = [Bank::Desjardins, Bank::Td];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Desjardins => DesjardinsParser.name(),
            Bank::Td => TdParser.name(),
        }
    }
}

impl Grammar for Bank {
    fn name(&self) -> &'static str {
        self.as_str()
    }

    fn can_parse(&self, path: &Path, sniff: &FileSniff) -> bool {
        match self {
            Bank::Desjardins => DesjardinsParser.can_parse(path, sniff),
            Bank::Td => TdParser.can_parse(path, sniff),
        }
    }

    fn parse_file(&self, path: &Path, sniff: &FileSniff) -> StatementResult<FileExtraction> {
        match self {
            Bank::Desjardins => DesjardinsParser.parse_file(path, sniff),
            Bank::Td => TdParser.parse_file(path, sniff),
        }
    }
}

impl FromStr for Bank {
    type Err = StatementParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Bank::ALL
            .into_iter()
            .find(|bank| bank.as_str() == name)
            .ok_or_else(|| StatementParseError::UnknownGrammar(name.to_string()))
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
pub struct ExtractionBuilder {
    input_dir: Option<PathBuf>,
    patterns: Vec<String>,
    bank: Option<Bank>,
}

impl ExtractionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Processa só nomes de arquivo que casam com este glob. Repetível; basta casar um.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.patterns.push(pattern.to_string());
        self
    }

    /// Força uma gramática. Ela precisa aceitar todo arquivo, senão o lote falha.
    pub fn bank(mut self, bank: Bank) -> Self {
        self.bank = Some(bank);
        self
    }

    /// Igual a [`ExtractionBuilder::bank`], mas pelo nome (`"td"`).
    pub fn bank_name(self, name: &str) -> StatementResult<Self> {
        Ok(self.bank(name.parse()?))
    }

    pub fn extract(self) -> StatementResult<Extraction> {
        let input_dir = self.input_dir.ok_or(StatementParseError::MissingInputDir)?;
        let patterns = dispatch::compile_patterns(&self.patterns)?;
        let files = dispatch::collect_files(&input_dir, &patterns)?;

        dispatch::extract_files(&files, &Bank::ALL, self.bank.as_ref())
    }
}
