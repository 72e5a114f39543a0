//! Order construction from trade intents.
//!
//! A `TradeIntent` names a side, price, and base-asset amount; the
//! builder resolves which asset the maker gives and which it takes,
//! converts both legs to integer base units, and packs expiration,
//! nonce, and fill flags into `MakerTraits`.

use alloy::primitives::{Address, U256};
use grid_core::{to_base_units, CoreError, OrderSide, TokenRef, TradeIntent};
use rand::Rng;

use crate::traits::{MakerTraits, UINT_40_MAX};

/// Default order lifetime when the caller does not specify one.
pub const DEFAULT_EXPIRATION_MINUTES: u64 = 60;

/// A fully specified limit order, ready for signing.
///
/// Immutable once built. Building is NOT deterministic: salt and nonce
/// are drawn fresh each call, so identical inputs produce distinct but
/// equally valid orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOrder {
    pub salt: U256,
    pub maker: Address,
    pub receiver: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
    pub maker_traits: MakerTraits,
}

/// Build a limit order from a suggested trade.
///
/// Sell: the maker gives `intent.amount` of the base token and asks
/// `amount * price` of the quote token. Buy: the legs swap. The
/// receiver is always the maker itself; proceeds are never routed
/// elsewhere. Partial and multiple fills are always enabled, since a
/// grid strategy depends on accumulating fills across price levels.
///
/// # Errors
/// `CoreError::InvalidAddress` if the maker or either asset address is
/// zero (named per field); `CoreError::Precision` if an amount leg is
/// negative.
pub fn build_limit_order(
    intent: &TradeIntent,
    base_token: &TokenRef,
    quote_token: &TokenRef,
    maker: Address,
    expiration_minutes: u64,
) -> Result<LimitOrder, CoreError> {
    let expiration = chrono::Utc::now().timestamp() as u64 + expiration_minutes * 60;

    let mut rng = rand::thread_rng();
    let nonce: u64 = rng.gen_range(0..=UINT_40_MAX);
    let salt: u64 = rng.gen_range(0..=UINT_40_MAX);

    let maker_traits = MakerTraits::new()
        .with_expiration(expiration)
        .with_nonce(nonce)
        .allow_partial_fills()
        .allow_multiple_fills();

    let base_amount = to_base_units(intent.amount, base_token.decimals)?;
    let quote_amount = to_base_units(intent.quote_value(), quote_token.decimals)?;

    let (maker_asset, taker_asset, making_amount, taking_amount) = match intent.side {
        OrderSide::Sell => (base_token.address, quote_token.address, base_amount, quote_amount),
        OrderSide::Buy => (quote_token.address, base_token.address, quote_amount, base_amount),
    };

    require_nonzero("maker", maker)?;
    require_nonzero("makerAsset", maker_asset)?;
    require_nonzero("takerAsset", taker_asset)?;

    Ok(LimitOrder {
        salt: U256::from(salt),
        maker,
        receiver: maker,
        maker_asset,
        taker_asset,
        making_amount,
        taking_amount,
        maker_traits,
    })
}

fn require_nonzero(field: &'static str, address: Address) -> Result<(), CoreError> {
    if address == Address::ZERO {
        return Err(CoreError::InvalidAddress {
            field,
            value: format!("{address:#x}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn weth() -> TokenRef {
        TokenRef::new(
            "WETH",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
                .parse()
                .unwrap(),
            18,
            "Wrapped Ether",
        )
    }

    fn usdt() -> TokenRef {
        TokenRef::new(
            "USDT",
            "0xdac17f958d2ee523a2206206994597c13d831ec7"
                .parse()
                .unwrap(),
            6,
            "Tether USD",
        )
    }

    fn maker() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    fn sell_intent() -> TradeIntent {
        TradeIntent::new(OrderSide::Sell, dec!(2340), dec!(0.1), "WETH", "test")
    }

    #[test]
    fn test_sell_order_amounts() {
        let order =
            build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();

        // 0.1 * 10^18 base units given, 0.1 * 2340 * 10^6 quote units asked.
        assert_eq!(
            order.making_amount,
            U256::from(100_000_000_000_000_000u128)
        );
        assert_eq!(order.taking_amount, U256::from(234_000_000u64));
        assert_eq!(order.maker_asset, weth().address);
        assert_eq!(order.taker_asset, usdt().address);
    }

    #[test]
    fn test_buy_order_swaps_legs() {
        let intent = TradeIntent::new(OrderSide::Buy, dec!(2340), dec!(0.1), "WETH", "test");
        let order = build_limit_order(&intent, &weth(), &usdt(), maker(), 60).unwrap();

        assert_eq!(order.maker_asset, usdt().address);
        assert_eq!(order.taker_asset, weth().address);
        assert_eq!(order.making_amount, U256::from(234_000_000u64));
        assert_eq!(
            order.taking_amount,
            U256::from(100_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_receiver_is_maker() {
        let order =
            build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        assert_eq!(order.receiver, order.maker);
    }

    #[test]
    fn test_fill_flags_always_enabled() {
        let order =
            build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        assert!(order.maker_traits.partial_fills_allowed());
        assert!(order.maker_traits.multiple_fills_allowed());
    }

    #[test]
    fn test_expiration_offset_from_now() {
        let before = chrono::Utc::now().timestamp() as u64;
        let order =
            build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        let after = chrono::Utc::now().timestamp() as u64;

        let expiration = order.maker_traits.expiration();
        assert!(expiration >= before + 3600);
        assert!(expiration <= after + 3600);
    }

    #[test]
    fn test_nonce_fits_40_bits() {
        let order =
            build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        assert!(order.maker_traits.nonce() <= UINT_40_MAX);
        assert!(order.salt <= U256::from(UINT_40_MAX));
    }

    #[test]
    fn test_repeated_builds_differ() {
        let a = build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        let b = build_limit_order(&sell_intent(), &weth(), &usdt(), maker(), 60).unwrap();
        // Salt is 40 random bits; a collision here means the RNG is broken.
        assert!(a.salt != b.salt || a.maker_traits.nonce() != b.maker_traits.nonce());
    }

    #[test]
    fn test_zero_maker_rejected_with_field() {
        let err = build_limit_order(&sell_intent(), &weth(), &usdt(), Address::ZERO, 60)
            .unwrap_err();
        match err {
            CoreError::InvalidAddress { field, .. } => assert_eq!(field, "maker"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_asset_rejected_with_field() {
        let mut bad_quote = usdt();
        bad_quote.address = Address::ZERO;
        let err = build_limit_order(&sell_intent(), &weth(), &bad_quote, maker(), 60)
            .unwrap_err();
        match err {
            CoreError::InvalidAddress { field, .. } => assert_eq!(field, "takerAsset"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_amount_propagates_precision_error() {
        let intent = TradeIntent::new(OrderSide::Sell, dec!(2340), dec!(-0.1), "WETH", "test");
        let err = build_limit_order(&intent, &weth(), &usdt(), maker(), 60).unwrap_err();
        assert!(matches!(err, CoreError::Precision(_)));
    }
}
