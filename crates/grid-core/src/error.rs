//! Error types for grid-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Amount cannot be represented in base units (negative or non-finite).
    #[error("Invalid amount: {0}")]
    Precision(String),

    /// A field that must hold a 20-byte hex address does not.
    #[error("Invalid {field} address: {value}")]
    InvalidAddress {
        field: &'static str,
        value: String,
    },

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    /// Order side string is neither "buy" nor "sell".
    #[error("Unknown order side: {0}")]
    UnknownSide(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
