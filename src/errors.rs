use std::path::PathBuf;

use thiserror::Error;

/// Erros fatais durante a extração de um lote de extratos.
///
/// Qualquer variante aborta o lote inteiro: um ledger parcial nunca é
/// apresentado como completo.
#[derive(Error, Debug)]
pub enum StatementParseError {
    /// Mais de um parser aceitou o mesmo arquivo
    #[error("Multiple parsers match file {}: {}", path.display(), grammars.join(", "))]
    AmbiguousGrammar { path: PathBuf, grammars: Vec<String> },

    /// O parser forçado pelo usuário recusou o arquivo
    #[error("Forced parser '{grammar}' cannot parse file: {}", path.display())]
    ForcedGrammarRejected { grammar: String, path: PathBuf },

    /// Nome de parser desconhecido
    #[error("Unknown parser '{0}'")]
    UnknownGrammar(String),

    /// Documento ilegível ou corrompido durante a extração
    #[error("Failed to read {}: {reason}", path.display())]
    ReadDocument { path: PathBuf, reason: String },

    /// Padrão glob de nome de arquivo inválido
    #[error("Invalid filename pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// O builder foi chamado sem diretório de entrada
    #[error("Input directory is required")]
    MissingInputDir,

    /// Erro ao ler o diretório ou arquivos do disco
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// Erro ao escrever ou ler o ledger em CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Linha inválida ao reler um ledger CSV (numerada a partir de 1)
    #[error("Invalid ledger row {row}: {reason}")]
    InvalidLedgerRow { row: usize, reason: RowError },
}

/// Alias conveniente para Result com nosso tipo de erro principal
pub type StatementResult<T> = Result<T, StatementParseError>;

/// Motivos para descartar uma única linha de transação.
///
/// Nunca aborta o arquivo: a linha é ignorada e contada.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Invalid date token '{0}'")]
    InvalidDate(String),

    #[error("Posted date {posted} precedes transaction date {transaction}")]
    PostedBeforeTransaction { transaction: String, posted: String },

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Empty description")]
    EmptyDescription,

    #[error("No amount column")]
    MissingAmount,
}
