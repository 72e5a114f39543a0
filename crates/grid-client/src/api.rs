//! Aggregation-service client: tokens, quotes, grid suggestions.

use std::collections::HashMap;
use std::time::Duration;

use dashmap::DashMap;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use grid_core::{decimal_from_f64, from_base_units, parse_address, to_base_units, TokenRef, TradeIntent};

use crate::error::{ClientError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the order aggregation service.
///
/// Cheap to clone is not a goal here; hold it behind an `Arc` if it
/// needs sharing. The token registry is cached per chain for the
/// lifetime of the client.
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// chain_id -> (symbol -> token). Token lists are static per chain.
    token_cache: DashMap<u64, HashMap<String, TokenRef>>,
}

/// Raw token entry as the registry returns it.
#[derive(Debug, Deserialize)]
struct RawToken {
    symbol: String,
    address: String,
    decimals: u8,
    #[serde(default)]
    name: Option<String>,
}

/// A batch of grid levels proposed by the suggestion service.
#[derive(Debug, Clone)]
pub struct GridSuggestions {
    pub intents: Vec<TradeIntent>,
    pub market_sentiment: String,
    pub reasoning: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionRequest<'a> {
    current_price: f64,
    base_asset: &'a str,
    quote_asset: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionResponse {
    #[serde(default)]
    grid_trades: Vec<RawSuggestion>,
    #[serde(default)]
    market_sentiment: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    /// "buy" or "sell".
    #[serde(rename = "type")]
    side: String,
    price: f64,
    amount: f64,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    dst_amount: String,
}

impl ApiClient {
    /// Create a client against the service root URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token_cache: DashMap::new(),
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch the token registry for a chain, keyed by upper-cased
    /// symbol. Cached after the first successful fetch.
    ///
    /// # Errors
    ///
    /// [`ClientError::Rejected`] on a non-success status,
    /// [`ClientError::Decode`] when no token in the response parses.
    pub async fn tokens(&self, chain_id: u64) -> Result<HashMap<String, TokenRef>> {
        if let Some(cached) = self.token_cache.get(&chain_id) {
            return Ok(cached.clone());
        }

        let url = self.url(&format!("/tokens?chainId={chain_id}"));
        debug!(chain_id, "fetching token registry");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        // The registry answers either `{"tokens": {addr: {...}}}` or a
        // bare address-keyed map depending on deployment.
        let entries = body
            .get("tokens")
            .and_then(|t| t.as_object())
            .or_else(|| body.as_object())
            .ok_or_else(|| ClientError::Decode("token response is not an object".to_owned()))?;

        let mut tokens = HashMap::new();
        for (key, value) in entries {
            let raw: RawToken = match serde_json::from_value(value.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed token entry");
                    continue;
                }
            };
            let address = match parse_address("address", &raw.address) {
                Ok(address) => address,
                Err(e) => {
                    warn!(symbol = %raw.symbol, error = %e, "skipping token with bad address");
                    continue;
                }
            };
            let display_name = raw.name.unwrap_or_else(|| raw.symbol.clone());
            tokens.insert(
                raw.symbol.to_uppercase(),
                TokenRef::new(raw.symbol, address, raw.decimals, display_name),
            );
        }

        if tokens.is_empty() {
            return Err(ClientError::Decode(format!(
                "no parseable tokens for chain {chain_id}"
            )));
        }

        info!(chain_id, count = tokens.len(), "token registry loaded");
        self.token_cache.insert(chain_id, tokens.clone());
        Ok(tokens)
    }

    /// Spot price of one unit of `base` denominated in `quote`,
    /// obtained by quoting a single-unit swap.
    ///
    /// # Errors
    ///
    /// Propagates transport, rejection and decode errors; also fails
    /// when the quoted amount does not parse as an integer quantity.
    pub async fn current_price(
        &self,
        chain_id: u64,
        base: &TokenRef,
        quote: &TokenRef,
    ) -> Result<Decimal> {
        let one_unit = to_base_units(Decimal::ONE, base.decimals)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let url = self.url(&format!(
            "/quote?chainId={chain_id}&src={}&dst={}&amount={one_unit}",
            base.address, quote.address
        ));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: QuoteResponse = response.json().await?;
        let dst: alloy::primitives::U256 = body
            .dst_amount
            .parse()
            .map_err(|e| ClientError::Decode(format!("bad dstAmount {:?}: {e}", body.dst_amount)))?;
        let price = from_base_units(dst, quote.decimals)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        debug!(base = %base.symbol, quote = %quote.symbol, price = %price, "quoted spot price");
        Ok(price)
    }

    /// Ask the suggestion service for a batch of grid levels around
    /// the current price.
    ///
    /// Suggestions with an unknown side or a non-finite price or
    /// amount are dropped with a warning rather than failing the
    /// batch.
    ///
    /// # Errors
    ///
    /// Propagates transport, rejection and decode errors.
    pub async fn grid_suggestions(
        &self,
        current_price: Decimal,
        base: &TokenRef,
        quote: &TokenRef,
    ) -> Result<GridSuggestions> {
        use rust_decimal::prelude::ToPrimitive;

        let request = SuggestionRequest {
            current_price: current_price.to_f64().unwrap_or_default(),
            base_asset: &base.symbol,
            quote_asset: &quote.symbol,
        };

        let response = self
            .client
            .post(self.url("/grid-suggestions"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: SuggestionResponse = response.json().await?;
        let mut intents = Vec::with_capacity(body.grid_trades.len());
        for raw in body.grid_trades {
            let side = match raw.side.to_lowercase().parse() {
                Ok(side) => side,
                Err(_) => {
                    warn!(side = %raw.side, "skipping suggestion with unknown side");
                    continue;
                }
            };
            let (price, amount) = match (decimal_from_f64(raw.price), decimal_from_f64(raw.amount))
            {
                (Ok(price), Ok(amount)) => (price, amount),
                _ => {
                    warn!(price = raw.price, amount = raw.amount, "skipping non-finite suggestion");
                    continue;
                }
            };
            intents.push(TradeIntent::new(
                side,
                price,
                amount,
                base.symbol.clone(),
                raw.reason.unwrap_or_default(),
            ));
        }

        info!(count = intents.len(), "grid suggestions received");
        Ok(GridSuggestions {
            intents,
            market_sentiment: body.market_sentiment.unwrap_or_default(),
            reasoning: body.reasoning.unwrap_or_default(),
        })
    }
}
