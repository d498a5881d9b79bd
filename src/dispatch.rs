//! Listagem de arquivos, escolha da gramática e extração em lote.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::document;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::traits::Grammar;
use crate::types::{FileSniff, Transaction};

/// Ledger de um lote mais os arquivos que nenhuma gramática reconheceu.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub transactions: Vec<Transaction>,
    pub unmatched: Vec<PathBuf>,
    /// Linhas malformadas descartadas em todos os arquivos.
    pub skipped_rows: usize,
}

pub fn compile_patterns(patterns: &[String]) -> StatementResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| StatementParseError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Arquivos regulares de `input_dir` cujo nome casa com algum padrão (todos
/// quando `patterns` está vazio), ordenados por nome.
pub fn collect_files(input_dir: &Path, patterns: &[Pattern]) -> StatementResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !patterns.is_empty() && !patterns.iter().any(|p| p.matches(&name)) {
            continue;
        }
        if entry.path().is_file() {
            files.push((name, entry.path()));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Escolhe a única gramática dona de `path`.
///
/// Uma gramática forçada precisa aceitar o arquivo. Fora isso, nenhuma
/// aceitação é `Ok(None)` e mais de uma é erro com todos os candidatos.
pub fn resolve_grammar<'g, G: Grammar>(
    path: &Path,
    sniff: &FileSniff,
    forced: Option<&'g G>,
    available: &'g [G],
) -> StatementResult<Option<&'g G>> {
    if let Some(grammar) = forced {
        if !grammar.can_parse(path, sniff) {
            return Err(StatementParseError::ForcedGrammarRejected {
                grammar: grammar.name().to_string(),
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(grammar));
    }

    let matches: Vec<&G> = available
        .iter()
        .filter(|grammar| grammar.can_parse(path, sniff))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        _ => Err(StatementParseError::AmbiguousGrammar {
            path: path.to_path_buf(),
            grammars: matches.iter().map(|g| g.name().to_string()).collect(),
        }),
    }
}

/// Espia, resolve e processa cada arquivo em ordem. O primeiro erro fatal
/// aborta o lote inteiro.
pub fn extract_files<G: Grammar>(
    files: &[PathBuf],
    available: &[G],
    forced: Option<&G>,
) -> StatementResult<Extraction> {
    let mut extraction = Extraction::default();

    for path in files {
        let sniff = document::sniff_file(path);
        let Some(grammar) = resolve_grammar(path, &sniff, forced, available)? else {
            log::debug!("No parser for file: {}", path.display());
            extraction.unmatched.push(path.clone());
            continue;
        };

        log::debug!("Parsing {} with {}...", path.display(), grammar.name());
        let parsed = grammar.parse_file(path, &sniff)?;
        log::info!(
            "{}: {} transactions, {} rows skipped",
            path.display(),
            parsed.transactions.len(),
            parsed.skipped_rows
        );

        extraction.skipped_rows += parsed.skipped_rows;
        extraction
            .transactions
            .extend(parsed.transactions.into_iter().map(|mut txn| {
                txn.parser = grammar.name().to_string();
                txn
            }));
    }

    Ok(extraction)
}
