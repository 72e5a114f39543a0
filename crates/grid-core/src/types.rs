//! Trade intents and token identities.
//!
//! `TradeIntent` is what the suggestion collaborator produces; `TokenRef`
//! is what the token-list collaborator resolves a symbol to on a given
//! chain. Both are immutable once constructed.

use crate::error::{CoreError, Result};
use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel address many aggregators use for the chain's native asset.
pub const NATIVE_TOKEN_SENTINEL: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Order side: buy or sell the base asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(CoreError::UnknownSide(other.to_string())),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single suggested grid trade.
///
/// `amount` is denominated in the base asset; `price` in quote per base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub side: OrderSide,
    pub price: Decimal,
    pub amount: Decimal,
    /// Symbol of the base asset (e.g. "WETH").
    pub base_symbol: String,
    /// Why the suggestion service proposed this level.
    pub rationale: String,
}

impl TradeIntent {
    pub fn new(
        side: OrderSide,
        price: Decimal,
        amount: Decimal,
        base_symbol: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            side,
            price,
            amount,
            base_symbol: base_symbol.into(),
            rationale: rationale.into(),
        }
    }

    /// Quote-asset value of this trade: `amount * price`.
    pub fn quote_value(&self) -> Decimal {
        self.amount * self.price
    }
}

/// A tradable asset on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
    pub display_name: String,
}

impl TokenRef {
    pub fn new(
        symbol: impl Into<String>,
        address: Address,
        decimals: u8,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
            display_name: display_name.into(),
        }
    }

    /// True if this is the chain's native asset (sentinel or zero address).
    pub fn is_native(&self) -> bool {
        self.address == NATIVE_TOKEN_SENTINEL || self.address == Address::ZERO
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

/// Parse a well-formed 20-byte hex address, naming the offending field
/// on failure.
pub fn parse_address(field: &'static str, value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|_| CoreError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_order_side_from_str() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn test_order_side_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), r#""buy""#);
        let side: OrderSide = serde_json::from_str(r#""sell""#).unwrap();
        assert_eq!(side, OrderSide::Sell);
    }

    #[test]
    fn test_trade_intent_quote_value() {
        let intent = TradeIntent::new(
            OrderSide::Sell,
            dec!(2340),
            dec!(0.1),
            "WETH",
            "resistance level",
        );
        assert_eq!(intent.quote_value(), dec!(234.0));
    }

    #[test]
    fn test_token_ref_native_detection() {
        let native = TokenRef::new("ETH", NATIVE_TOKEN_SENTINEL, 18, "Ether");
        assert!(native.is_native());

        let zero = TokenRef::new("ETH", Address::ZERO, 18, "Ether");
        assert!(zero.is_native());

        let weth = TokenRef::new(
            "WETH",
            parse_address("makerAsset", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
            18,
            "Wrapped Ether",
        );
        assert!(!weth.is_native());
    }

    #[test]
    fn test_parse_address_names_field() {
        let err = parse_address("maker", "0x1234").unwrap_err();
        match err {
            CoreError::InvalidAddress { field, value } => {
                assert_eq!(field, "maker");
                assert_eq!(value, "0x1234");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_address_roundtrip() {
        let addr = parse_address("maker", "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270").unwrap();
        assert_eq!(
            format!("{addr:#x}"),
            "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"
        );
    }
}
