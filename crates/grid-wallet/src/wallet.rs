//! Hot-wallet generation, persistence, and balance queries.
//!
//! Exactly one hot wallet exists per device. It is created on first
//! use, persisted as JSON next to the application's other local state,
//! and never transmitted anywhere. The persisted address is only a
//! convenience copy: on load it is verified against the address derived
//! from the key, and the file is discarded on mismatch.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use grid_core::{from_base_units, TokenRef};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::rpc::RpcClient;

const WALLET_FILE: &str = "hot_wallet.json";

/// Persisted wallet shape. The private key is hex with 0x prefix and
/// stays inside a `Zeroizing` buffer from generation to disk and back.
/// No Debug impl: this struct must never reach log output.
#[derive(Serialize, Deserialize)]
struct StoredWallet {
    address: String,
    #[serde(rename = "privateKey")]
    private_key: Zeroizing<String>,
}

/// The session's maker identity.
///
/// Wraps a `PrivateKeySigner`; the address is always derived from the
/// key, never stored separately in memory.
pub struct HotWallet {
    signer: PrivateKeySigner,
}

impl HotWallet {
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Borrow the signing key for local order signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl std::fmt::Debug for HotWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material through Debug output.
        f.debug_struct("HotWallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Owns the hot wallet's lifecycle: load-or-generate, file persistence,
/// and balance queries against a chain RPC.
pub struct HotWalletManager {
    dir: PathBuf,
    cached: Mutex<Option<Arc<HotWallet>>>,
}

impl HotWalletManager {
    /// Create a manager rooted at `dir`. The directory is created lazily
    /// on first persist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cached: Mutex::new(None),
        }
    }

    fn wallet_path(&self) -> PathBuf {
        self.dir.join(WALLET_FILE)
    }

    /// Load the persisted wallet, or generate and persist a fresh one.
    ///
    /// Idempotent: after the first call the same in-memory instance is
    /// returned for the rest of the session. Malformed or inconsistent
    /// persisted data is discarded and treated as "no wallet yet".
    pub fn get_or_create(&self) -> WalletResult<Arc<HotWallet>> {
        let mut cached = self.cached.lock();
        if let Some(wallet) = cached.as_ref() {
            return Ok(Arc::clone(wallet));
        }

        let wallet = match self.load_persisted() {
            Some(wallet) => wallet,
            None => self.generate_and_persist()?,
        };

        let wallet = Arc::new(wallet);
        *cached = Some(Arc::clone(&wallet));
        Ok(wallet)
    }

    /// Remove the persisted wallet and forget the cached instance.
    ///
    /// The next `get_or_create` generates a fresh keypair.
    pub fn clear(&self) -> WalletResult<()> {
        let mut cached = self.cached.lock();
        *cached = None;
        let path = self.wallet_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            info!(path = %path.display(), "Removed persisted hot wallet");
        }
        Ok(())
    }

    fn load_persisted(&self) -> Option<HotWallet> {
        let path = self.wallet_path();
        let content = std::fs::read_to_string(&path).ok()?;

        let stored: StoredWallet = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding malformed hot wallet file");
                return None;
            }
        };

        let signer = match parse_private_key(&stored.private_key) {
            Ok(signer) => signer,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding hot wallet with invalid key");
                return None;
            }
        };

        // The stored address must be derivable from the key.
        match stored.address.parse::<Address>() {
            Ok(addr) if addr == signer.address() => {}
            _ => {
                warn!(
                    path = %path.display(),
                    "Discarding hot wallet: stored address does not match key"
                );
                return None;
            }
        }

        debug!(address = %signer.address(), "Loaded persisted hot wallet");
        Some(HotWallet { signer })
    }

    fn generate_and_persist(&self) -> WalletResult<HotWallet> {
        let signer = PrivateKeySigner::random();
        let address = signer.address();

        std::fs::create_dir_all(&self.dir)?;
        let stored = StoredWallet {
            address: format!("{address:#x}"),
            private_key: Zeroizing::new(format!("0x{}", hex::encode(signer.to_bytes()))),
        };
        let path = self.wallet_path();
        std::fs::write(&path, serde_json::to_string_pretty(&stored)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!(address = %address, path = %path.display(), "Generated new hot wallet");
        Ok(HotWallet { signer })
    }

    /// Query the hot wallet's balance of `token` in human decimal units.
    ///
    /// The native sentinel (or zero) address routes to `eth_getBalance`;
    /// anything else is an ERC-20 `balanceOf` call. RPC failures degrade
    /// to zero with a warning: balance checks gate trading, they must
    /// never crash it.
    pub async fn balance(&self, rpc: &RpcClient, token: &TokenRef) -> Decimal {
        let wallet = match self.get_or_create() {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(error = %e, "Hot wallet unavailable for balance query");
                return Decimal::ZERO;
            }
        };

        let raw: WalletResult<U256> = if token.is_native() {
            rpc.native_balance(wallet.address()).await
        } else {
            rpc.erc20_balance(token.address, wallet.address()).await
        };

        match raw {
            Ok(units) => match from_base_units(units, token.decimals) {
                Ok(amount) => amount,
                Err(e) => {
                    warn!(token = %token.symbol, error = %e, "Balance does not fit a decimal");
                    Decimal::ZERO
                }
            },
            Err(e) => {
                warn!(token = %token.symbol, error = %e, "Balance query failed, treating as zero");
                Decimal::ZERO
            }
        }
    }
}

fn parse_private_key(hex_str: &str) -> WalletResult<PrivateKeySigner> {
    let trimmed = hex_str.trim().trim_start_matches("0x");
    let secret_bytes: Zeroizing<Vec<u8>> = Zeroizing::new(hex::decode(trimmed)?);
    PrivateKeySigner::from_slice(&secret_bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))
}
