use std::path::Path;

use crate::errors::StatementResult;
use crate::types::{FileExtraction, FileSniff};

/// Reconhecedor e extrator de um layout de extrato de uma instituição.
pub trait Grammar {
    fn name(&self) -> &'static str;

    /// Teste de aceitação de alta precisão. Mais de uma gramática aceitando
    /// o mesmo arquivo é erro do lote, então exija vários marcadores independentes.
    fn can_parse(&self, path: &Path, sniff: &FileSniff) -> bool;

    /// Extração completa. Pode reler o documento; `sniff` só traz a primeira página.
    fn parse_file(&self, path: &Path, sniff: &FileSniff) -> StatementResult<FileExtraction>;
}

/// Extensões que toda gramática de extrato consegue ler.
pub(crate) fn is_statement_document(sniff: &FileSniff) -> bool {
    matches!(sniff.extension.as_str(), ".pdf" | ".txt")
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
