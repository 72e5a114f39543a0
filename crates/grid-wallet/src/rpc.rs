//! Minimal JSON-RPC client for chain balance queries.
//!
//! Only the two calls the wallet needs: `eth_getBalance` for the native
//! asset and `eth_call` with `balanceOf(address)` calldata for ERC-20
//! tokens.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{WalletError, WalletResult};

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `balanceOf(address)` function selector.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Public RPC endpoints per chain id.
static DEFAULT_RPC_URLS: Lazy<Vec<(u64, &'static str)>> = Lazy::new(|| {
    vec![
        (1, "https://rpc.eth.gateway.fm"),
        (10, "https://mainnet.optimism.io"),
        (56, "https://bsc-dataseed.binance.org"),
        (137, "https://1rpc.io/matic"),
        (8453, "https://mainnet.base.org"),
        (42161, "https://arb1.arbitrum.io/rpc"),
        (43114, "https://api.avax.network/ext/bc/C/rpc"),
    ]
});

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Value,
}

/// JSON-RPC-over-HTTP client bound to a single endpoint.
pub struct RpcClient {
    client: Client,
    url: String,
}

impl RpcClient {
    /// Create a client for an explicit endpoint URL.
    pub fn new(url: impl Into<String>) -> WalletResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Rpc(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a client for a known chain id using the built-in endpoint table.
    pub fn for_chain(chain_id: u64) -> WalletResult<Self> {
        let url = DEFAULT_RPC_URLS
            .iter()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, url)| *url)
            .ok_or(WalletError::UnknownChain(chain_id))?;
        Self::new(url)
    }

    /// Native asset balance of `address` in base units (wei).
    pub async fn native_balance(&self, address: Address) -> WalletResult<U256> {
        let result = self
            .call("eth_getBalance", json!([format!("{address:#x}"), "latest"]))
            .await?;
        parse_quantity(&result)
    }

    /// ERC-20 balance of `holder` for contract `token`, in token base units.
    pub async fn erc20_balance(&self, token: Address, holder: Address) -> WalletResult<U256> {
        let data = format!(
            "0x{BALANCE_OF_SELECTOR}{:0>64}",
            hex::encode(holder.as_slice())
        );
        let result = self
            .call(
                "eth_call",
                json!([{ "to": format!("{token:#x}"), "data": data }, "latest"]),
            )
            .await?;
        parse_quantity(&result)
    }

    async fn call(&self, method: &str, params: Value) -> WalletResult<Value> {
        debug!(url = %self.url, method, "RPC request");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::Rpc(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WalletError::Rpc(format!("HTTP {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WalletError::Rpc(format!("Failed to parse response: {e}")))?;

        if let Some(error) = body.get("error") {
            return Err(WalletError::RpcResponse(error.to_string()));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| WalletError::RpcResponse("missing result field".to_string()))
    }
}

fn parse_quantity(value: &Value) -> WalletResult<U256> {
    let text = value
        .as_str()
        .ok_or_else(|| WalletError::RpcResponse(format!("non-string quantity: {value}")))?;
    let digits = text.trim_start_matches("0x");
    // eth_call on a non-contract returns "0x"; treat as zero.
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| WalletError::RpcResponse(format!("bad quantity {text}: {e}")))
}
