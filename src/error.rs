//! Error types for pose-ethogram

use thiserror::Error;

/// Errors that can occur during ingestion, evaluation, or overlay planning.
///
/// Missing or malformed numeric values are NOT errors: they become NaN at
/// ingestion, every NaN comparison in the scoring rules evaluates false, and
/// confidence silently drops. Only structural problems are surfaced here.
#[derive(Debug, Error)]
pub enum EthogramError {
    #[error("Failed to parse pose table: {0}")]
    ParseError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Inconsistent column schema: {0}")]
    SchemaError(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid overlay timing: {0}")]
    InvalidTiming(String),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("Evaluation error: {0}")]
    EvaluationError(String),
}
