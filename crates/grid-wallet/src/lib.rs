//! Hot-wallet management for the grid order pipeline.
//!
//! The hot wallet is a locally generated keypair used as the order
//! maker, distinct from any externally connected user wallet. This
//! crate owns its creation and persistence exclusively; every other
//! component only reads the derived address or borrows the signer.

pub mod error;
pub mod rpc;
pub mod wallet;

pub use error::{WalletError, WalletResult};
pub use rpc::RpcClient;
pub use wallet::{HotWallet, HotWalletManager};
