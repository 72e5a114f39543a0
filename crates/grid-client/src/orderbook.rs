//! Orderbook surface: submit signed orders, list a maker's orders.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use grid_order::SignedOrder;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::wire::ApiOrder;

/// Status of an order as tracked by the orderbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteOrderStatus {
    Pending,
    Filled,
    Cancelled,
}

/// An order as returned by the orderbook listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrder {
    pub order_hash: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub create_date_time: Option<String>,
    pub data: RemoteOrderData,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrderData {
    pub maker_asset: String,
    pub taker_asset: String,
    pub making_amount: String,
    pub taking_amount: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    order: ApiOrder,
    signature: String,
    chain_id: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map the orderbook's free-form status string to [`RemoteOrderStatus`].
///
/// Unknown statuses map to `Pending`; an order the service still
/// tracks but labels unexpectedly is safest treated as live.
pub fn map_order_status(status: &str) -> RemoteOrderStatus {
    match status.to_lowercase().as_str() {
        "filled" | "executed" => RemoteOrderStatus::Filled,
        "cancelled" | "canceled" => RemoteOrderStatus::Cancelled,
        _ => RemoteOrderStatus::Pending,
    }
}

impl ApiClient {
    /// Submit a signed order to the orderbook.
    ///
    /// # Errors
    ///
    /// [`ClientError::Serialization`] when the order fails wire
    /// validation, [`ClientError::Rejected`] with the service's status
    /// and message on a non-success response, [`ClientError::Transport`]
    /// when no response arrives at all.
    pub async fn submit_order(&self, signed: &SignedOrder, chain_id: u64) -> Result<()> {
        let request = SubmitRequest {
            order: ApiOrder::from_order(&signed.order)?,
            signature: signed.signature.clone(),
            chain_id,
        };

        debug!(order_hash = %signed.order_hash, chain_id, "submitting order");

        let response = self
            .http()
            .post(self.url("/submit-order"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or(body);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        info!(order_hash = %signed.order_hash, "order accepted by orderbook");
        Ok(())
    }

    /// List the orderbook's records for a maker address.
    ///
    /// # Errors
    ///
    /// [`ClientError::Rejected`] on a non-success status; decode
    /// failures surface as [`ClientError::Decode`].
    pub async fn orders_by_maker(
        &self,
        maker: &str,
        chain_id: u64,
    ) -> Result<Vec<RemoteOrder>> {
        let url = self.url(&format!("/orders?maker={maker}&chainId={chain_id}"));
        let response = self.http().get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let orders = parse_orders(body)?;
        debug!(maker = %maker, count = orders.len(), "fetched maker orders");
        Ok(orders)
    }
}

/// The listing endpoint answers either `{"orders": [...]}` or a bare
/// array depending on deployment.
fn parse_orders(body: serde_json::Value) -> Result<Vec<RemoteOrder>> {
    let entries = match body.get("orders") {
        Some(wrapped) => wrapped.clone(),
        None => body,
    };
    serde_json::from_value(entries).map_err(|e| ClientError::Decode(e.to_string()))
}
