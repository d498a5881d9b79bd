//! Acesso ao texto das páginas de um extrato.
//!
//! Arquivos `.pdf` passam pelo `pdf-extract` (leitura completa) ou pelo
//! `lopdf` (só a primeira página); arquivos `.txt` já contêm o texto
//! extraído, uma página por form feed.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::panic;
use std::path::Path;

use crate::errors::{StatementParseError, StatementResult};
use crate::types::FileSniff;

const PAGE_BREAK: char = '\x0c';

/// Extensão em minúsculas com o ponto inicial, ou string vazia.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn read_error(path: &Path, reason: impl Into<String>) -> StatementParseError {
    StatementParseError::ReadDocument {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Lê todas as páginas do documento como texto puro.
pub fn read_pages(path: &Path) -> StatementResult<Vec<String>> {
    match extension_of(path).as_str() {
        ".pdf" => {
            let bytes = fs::read(path).map_err(|e| read_error(path, e.to_string()))?;
            // pdf-extract panics on some malformed streams
            panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
                .map_err(|_| read_error(path, "PDF text extraction panicked"))?
                .map_err(|e| read_error(path, e.to_string()))
        }
        ".txt" => {
            let text = fs::read_to_string(path).map_err(|e| read_error(path, e.to_string()))?;
            Ok(text.split(PAGE_BREAK).map(str::to_string).collect())
        }
        other => Err(read_error(path, format!("unsupported document type '{other}'"))),
    }
}

/// Lê apenas a primeira página, sem decodificar o resto do documento.
pub fn read_first_page(path: &Path) -> StatementResult<String> {
    match extension_of(path).as_str() {
        ".pdf" => {
            let bytes = fs::read(path).map_err(|e| read_error(path, e.to_string()))?;
            panic::catch_unwind(|| first_pdf_page(&bytes))
                .map_err(|_| read_error(path, "PDF text extraction panicked"))?
                .map_err(|reason| read_error(path, reason))
        }
        ".txt" => {
            let file = File::open(path).map_err(|e| read_error(path, e.to_string()))?;
            let mut page = Vec::new();
            BufReader::new(file)
                .read_until(PAGE_BREAK as u8, &mut page)
                .map_err(|e| read_error(path, e.to_string()))?;
            if page.last() == Some(&(PAGE_BREAK as u8)) {
                page.pop();
            }
            String::from_utf8(page).map_err(|e| read_error(path, e.to_string()))
        }
        other => Err(read_error(path, format!("unsupported document type '{other}'"))),
    }
}

fn first_pdf_page(bytes: &[u8]) -> Result<String, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
    let first = doc
        .get_pages()
        .keys()
        .next()
        .copied()
        .ok_or_else(|| "document has no pages".to_string())?;
    doc.extract_text(&[first]).map_err(|e| e.to_string())
}

/// Espia a primeira página. Nunca falha: conteúdo ilegível vira `None`.
pub fn sniff_file(path: &Path) -> FileSniff {
    let extension = extension_of(path);
    let first_page_text = match extension.as_str() {
        ".pdf" | ".txt" => match read_first_page(path) {
            Ok(page) => Some(page),
            Err(err) => {
                log::debug!("sniff failed for {}: {}", path.display(), err);
                None
            }
        },
        _ => None,
    };

    FileSniff {
        extension,
        first_page_text,
    }
}
