//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Import text is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed JSON that does not have the movement-record shape.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("movement {0} not found")]
    NotFound(u64),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid movement type: {0:?} (expected \"debito\" or \"credito\")")]
    InvalidKind(String),

    #[error("corrupted storage key {key:?}: {reason}")]
    Corrupted { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
