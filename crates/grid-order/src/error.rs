//! Error types for grid-order.

use thiserror::Error;

/// Signing errors.
///
/// Collaborator failures: callers record them per order rather than
/// aborting a batch, and never retry automatically.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The signing collaborator declined (user rejected, wallet
    /// disconnected mid-request).
    #[error("Signer declined the request: {0}")]
    Declined(String),

    #[error("Signing failed: {0}")]
    Signer(#[from] alloy::signers::Error),
}
