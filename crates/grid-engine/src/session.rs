//! Grid session: drives a suggestion batch through the pipeline.
//!
//! One session owns the hot wallet, the chain RPC, the aggregation
//! client and the record store. Batches run sequentially; an order is
//! fully submitted (or failed) before the next intent starts, so a
//! batch never holds more than one in-flight request.

use alloy::primitives::Address;
use tracing::{error, info, warn};

use grid_client::{ApiClient, ClientError};
use grid_core::{OrderSide, TokenRef, TradeIntent};
use grid_order::{build_limit_order, sign_order, MakerSigner};
use grid_wallet::{HotWalletManager, RpcClient};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::preflight::check_sell_sufficiency;
use crate::record::{OrderRecord, RecordId};
use crate::store::RecordStore;

/// Outcome of one batch execution.
#[derive(Debug)]
pub struct BatchReport {
    pub records: Vec<OrderRecord>,
    pub submitted: usize,
    pub failed: usize,
}

/// A trading session bound to one chain and one hot wallet.
pub struct GridSession {
    config: EngineConfig,
    wallets: HotWalletManager,
    rpc: RpcClient,
    api: ApiClient,
    store: RecordStore,
}

impl GridSession {
    /// Build a session from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the RPC or API client cannot be constructed, or the
    /// chain has no default RPC endpoint and none was configured.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let rpc = match &config.rpc_url {
            Some(url) => RpcClient::new(url.clone())?,
            None => RpcClient::for_chain(config.chain_id)?,
        };
        let api = ApiClient::new(config.api_base_url.clone())?;
        let wallets = HotWalletManager::new(&config.wallet_dir);

        Ok(Self {
            config,
            wallets,
            rpc,
            api,
            store: RecordStore::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Full grid cycle: resolve the configured pair, quote the current
    /// price, fetch suggestions, execute the batch.
    ///
    /// # Errors
    ///
    /// Propagates token-registry, quote and suggestion failures, plus
    /// everything [`Self::execute_batch`] propagates.
    pub async fn run_grid_cycle(&self) -> Result<BatchReport> {
        let tokens = self.api.tokens(self.config.chain_id).await?;
        let base = tokens
            .get(&self.config.base_symbol.to_uppercase())
            .ok_or_else(|| {
                EngineError::Config(format!("unknown base symbol {}", self.config.base_symbol))
            })?
            .clone();
        let quote = tokens
            .get(&self.config.quote_symbol.to_uppercase())
            .ok_or_else(|| {
                EngineError::Config(format!("unknown quote symbol {}", self.config.quote_symbol))
            })?
            .clone();

        let price = self
            .api
            .current_price(self.config.chain_id, &base, &quote)
            .await?;
        info!(pair = %format!("{}/{}", base.symbol, quote.symbol), price = %price, "starting grid cycle");

        let suggestions = self.api.grid_suggestions(price, &base, &quote).await?;
        let wallet = self.wallets.get_or_create()?;
        let signer = MakerSigner::Local(wallet.signer().clone());
        self.execute_batch(suggestions.intents, &base, &quote, wallet.address(), &signer)
            .await
    }

    /// Execute a batch of intents against the orderbook.
    ///
    /// `maker` is the order maker; `signer` is its signing capability,
    /// either the hot-wallet key or a delegated external wallet. Every
    /// intent gets a `Ready` record up front. Sell-side balance
    /// preflight runs before any order is built; on failure all records
    /// stay `Ready` and the error propagates. Per intent, the record
    /// enters `Created` as soon as the order is built; a build or
    /// wire-validation error fails the record and aborts the batch,
    /// while signing and submission failures fail only their own
    /// record and the batch continues.
    ///
    /// # Errors
    ///
    /// [`EngineError::InsufficientBalance`] from preflight, or the
    /// propagated validation error described above.
    pub async fn execute_batch(
        &self,
        intents: Vec<TradeIntent>,
        base: &TokenRef,
        quote: &TokenRef,
        maker: Address,
        signer: &MakerSigner,
    ) -> Result<BatchReport> {
        let ids: Vec<RecordId> = intents
            .iter()
            .map(|intent| self.store.insert(intent.clone()))
            .collect();

        if intents.iter().any(|i| i.side == OrderSide::Sell) {
            let available = self.wallets.balance(&self.rpc, base).await;
            check_sell_sufficiency(&intents, base, available)?;
        }

        let mut submitted = 0usize;
        let mut failed = 0usize;

        for (id, intent) in ids.iter().zip(&intents) {
            let order = match build_limit_order(
                intent,
                base,
                quote,
                maker,
                self.config.expiration_minutes,
            ) {
                Ok(order) => order,
                Err(e) => {
                    error!(record_id = %id, error = %e, "order build failed, aborting batch");
                    self.store.mark_failed(id, e.to_string())?;
                    return Err(e.into());
                }
            };
            // The record holds the built order through the signing
            // suspension point, which may wait on human interaction.
            self.store.attach_order(id, order.clone())?;

            let signed = match sign_order(&order, self.config.chain_id, signer).await {
                Ok(signed) => signed,
                Err(e) => {
                    warn!(record_id = %id, error = %e, "signing failed");
                    self.store.mark_failed(id, e.to_string())?;
                    failed += 1;
                    continue;
                }
            };
            self.store.record_signature(id, &signed)?;

            match self.api.submit_order(&signed, self.config.chain_id).await {
                Ok(()) => {
                    self.store.mark_submitted(id)?;
                    submitted += 1;
                    info!(record_id = %id, order_hash = %signed.order_hash, "order submitted");
                }
                Err(e @ ClientError::Serialization { .. }) => {
                    error!(record_id = %id, error = %e, "wire validation failed, aborting batch");
                    self.store.mark_failed(id, e.to_string())?;
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(record_id = %id, error = %e, "submission failed");
                    self.store.mark_failed(id, e.to_string())?;
                    failed += 1;
                }
            }
        }

        info!(total = ids.len(), submitted, failed, "batch complete");
        let records = ids.iter().filter_map(|id| self.store.get(id)).collect();
        Ok(BatchReport {
            records,
            submitted,
            failed,
        })
    }
}
