//! Limit order construction and signing for the 1inch Limit Order
//! Protocol v4.
//!
//! Turns a `TradeIntent` plus two token identities into a fully
//! specified limit order (maker/taker assets and amounts, expiration,
//! nonce, fill flags packed into `MakerTraits`), then signs it for a
//! specific chain with either the hot-wallet key or a delegated
//! external signer.

pub mod error;
pub mod order;
pub mod signing;
pub mod traits;

pub use error::SigningError;
pub use order::{build_limit_order, LimitOrder, DEFAULT_EXPIRATION_MINUTES};
pub use signing::{
    encode_signature, order_hash, sign_order, ExternalSigner, MakerSigner, SignedOrder,
};
pub use traits::MakerTraits;
