//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{EngineError, Result};

/// Top-level engine configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// EVM chain id orders are built and signed for.
    pub chain_id: u64,
    /// Root URL of the order aggregation service.
    pub api_base_url: String,
    /// JSON-RPC endpoint override; when unset, a per-chain default is
    /// used.
    pub rpc_url: Option<String>,
    /// Directory where the hot-wallet keystore lives.
    pub wallet_dir: PathBuf,
    /// How long submitted orders stay fillable.
    pub expiration_minutes: u64,
    /// Base/quote pair the grid trades, as registry symbols.
    pub base_symbol: String,
    pub quote_symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            api_base_url: "http://localhost:3000/api".to_string(),
            rpc_url: None,
            wallet_dir: PathBuf::from(".grid-wallet"),
            expiration_minutes: grid_order::DEFAULT_EXPIRATION_MINUTES,
            base_symbol: "WETH".to_string(),
            quote_symbol: "USDT".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the path in `GRID_CONFIG`, falling back
    /// to `config/default.toml`, then to defaults when neither exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when a file exists but cannot
    /// be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("GRID_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            warn!(path = %config_path, "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] on read or parse failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::Config(format!("failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("failed to parse config: {e}")))
    }
}
