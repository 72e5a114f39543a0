//! Error types for grid-wallet.

use thiserror::Error;

/// Wallet and RPC errors.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to decode hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("No RPC endpoint known for chain {0}")]
    UnknownChain(u64),

    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("RPC error response: {0}")]
    RpcResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for wallet operations.
pub type WalletResult<T> = std::result::Result<T, WalletError>;
