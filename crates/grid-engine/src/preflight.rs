//! Batch preflight checks.

use rust_decimal::Decimal;

use grid_core::{OrderSide, TokenRef, TradeIntent};

use crate::error::{EngineError, Result};

/// Verify the wallet's base-asset balance covers every sell in the
/// batch. Pure: callers fetch the balance.
///
/// Buys are not checked here; quote-asset funding is enforced by the
/// orderbook at fill time, not at submission.
///
/// # Errors
///
/// [`EngineError::InsufficientBalance`] with the total required and
/// the available amount when sells exceed the balance.
pub fn check_sell_sufficiency(
    intents: &[TradeIntent],
    base: &TokenRef,
    available: Decimal,
) -> Result<()> {
    let required: Decimal = intents
        .iter()
        .filter(|intent| intent.side == OrderSide::Sell)
        .map(|intent| intent.amount)
        .sum();

    if required > available {
        return Err(EngineError::InsufficientBalance {
            symbol: base.symbol.clone(),
            required,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use rust_decimal_macros::dec;

    fn weth() -> TokenRef {
        TokenRef::new(
            "WETH",
            address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            18,
            "Wrapped Ether",
        )
    }

    fn sell(amount: Decimal) -> TradeIntent {
        TradeIntent::new(OrderSide::Sell, dec!(2340), amount, "WETH", "test")
    }

    fn buy(amount: Decimal) -> TradeIntent {
        TradeIntent::new(OrderSide::Buy, dec!(2200), amount, "WETH", "test")
    }

    #[test]
    fn test_sells_within_balance_pass() {
        let intents = vec![sell(dec!(0.1)), sell(dec!(0.2))];
        assert!(check_sell_sufficiency(&intents, &weth(), dec!(0.3)).is_ok());
    }

    #[test]
    fn test_sells_exceeding_balance_fail_with_totals() {
        let intents = vec![sell(dec!(0.5)), sell(dec!(0.5)), sell(dec!(0.5))];
        match check_sell_sufficiency(&intents, &weth(), dec!(0.3)).unwrap_err() {
            EngineError::InsufficientBalance {
                symbol,
                required,
                available,
            } => {
                assert_eq!(symbol, "WETH");
                assert_eq!(required, dec!(1.5));
                assert_eq!(available, dec!(0.3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_buys_do_not_count_against_base_balance() {
        let intents = vec![buy(dec!(5)), sell(dec!(0.1))];
        assert!(check_sell_sufficiency(&intents, &weth(), dec!(0.1)).is_ok());
    }

    #[test]
    fn test_empty_batch_passes_with_zero_balance() {
        assert!(check_sell_sufficiency(&[], &weth(), Decimal::ZERO).is_ok());
    }
}
