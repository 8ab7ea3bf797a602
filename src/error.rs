//! Error types for aigarth

use thiserror::Error;

/// Aigarth error type
#[derive(Debug, Error)]
pub enum AigarthError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/serialize error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Matrix has the wrong dimensions
    #[error("Matrix shape mismatch: got {rows}x{cols}, expected {expected}x{expected}")]
    MatrixShape {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    /// Matrix cell is neither a byte value nor a placeholder
    #[error("Invalid matrix cell at [{row}][{col}]: {value}")]
    InvalidCell {
        row: usize,
        col: usize,
        value: String,
    },

    /// Network or engine configuration rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Input could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation needs matrix data but the engine runs without it
    #[error("Matrix not loaded")]
    MatrixNotLoaded,
}

pub type Result<T> = std::result::Result<T, AigarthError>;
