//! Wire representation of a limit order.
//!
//! The orderbook accepts every numeric field as a decimal string, so a
//! `uint256` survives JSON without precision loss. Conversion is the
//! last validation gate before an order leaves the process.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use grid_order::LimitOrder;

use crate::error::{ClientError, Result};

/// JSON shape of an order as the orderbook expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrder {
    pub salt: String,
    pub maker: String,
    pub receiver: String,
    pub maker_asset: String,
    pub taker_asset: String,
    pub making_amount: String,
    pub taking_amount: String,
    pub maker_traits: String,
}

impl ApiOrder {
    /// Serialize an order for submission.
    ///
    /// A zero receiver is replaced with the maker address; the
    /// orderbook rejects the zero address outright, and "pay the
    /// maker" is what a zero receiver means on-chain anyway.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] naming the offending
    /// field when maker or either asset is the zero address, or when
    /// either amount is zero.
    pub fn from_order(order: &LimitOrder) -> Result<Self> {
        require_nonzero_address("maker", order.maker)?;
        require_nonzero_address("makerAsset", order.maker_asset)?;
        require_nonzero_address("takerAsset", order.taker_asset)?;

        if order.making_amount.is_zero() {
            return Err(ClientError::Serialization {
                field: "makingAmount",
                value: "0".to_owned(),
            });
        }
        if order.taking_amount.is_zero() {
            return Err(ClientError::Serialization {
                field: "takingAmount",
                value: "0".to_owned(),
            });
        }

        let receiver = if order.receiver.is_zero() {
            order.maker
        } else {
            order.receiver
        };

        Ok(Self {
            salt: order.salt.to_string(),
            maker: checksummed(order.maker),
            receiver: checksummed(receiver),
            maker_asset: checksummed(order.maker_asset),
            taker_asset: checksummed(order.taker_asset),
            making_amount: order.making_amount.to_string(),
            taking_amount: order.taking_amount.to_string(),
            maker_traits: order.maker_traits.as_raw().to_string(),
        })
    }
}

fn checksummed(address: Address) -> String {
    address.to_checksum(None)
}

fn require_nonzero_address(field: &'static str, address: Address) -> Result<()> {
    if address.is_zero() {
        return Err(ClientError::Serialization {
            field,
            value: address.to_string(),
        });
    }
    Ok(())
}
