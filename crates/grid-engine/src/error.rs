//! Engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::record::{LifecycleEvent, RecordStatus};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] grid_core::CoreError),

    #[error(transparent)]
    Wallet(#[from] grid_wallet::WalletError),

    #[error(transparent)]
    Signing(#[from] grid_order::SigningError),

    #[error(transparent)]
    Client(#[from] grid_client::ClientError),

    /// Sell-side preflight failed: the wallet cannot cover the batch.
    #[error("Insufficient {symbol} balance: need {required}, have {available}")]
    InsufficientBalance {
        symbol: String,
        required: Decimal,
        available: Decimal,
    },

    /// A lifecycle event arrived that the current status does not accept.
    #[error("Invalid transition: {from:?} does not accept {event:?}")]
    InvalidTransition {
        from: RecordStatus,
        event: LifecycleEvent,
    },

    #[error("Unknown record: {0}")]
    UnknownRecord(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
