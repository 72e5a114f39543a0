//! Exact conversion between human decimal amounts and integer token
//! base units.
//!
//! UI-facing amounts often carry floating-point artifacts with more
//! fractional digits than the token supports. Conversion therefore
//! rounds to the token's decimal count *before* scaling, so the result
//! is always an exact integer number of base units. All arithmetic is
//! on `Decimal` mantissa/scale pairs and `U256`; no floats.

use crate::error::{CoreError, Result};
use alloy::primitives::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert a human decimal amount into integer base units (`amount * 10^decimals`).
///
/// Rounds half-away-from-zero to `decimals` fractional digits first, so
/// inputs like `0.30000000000000004` land on the intended unit count.
///
/// # Errors
/// `CoreError::Precision` if `amount` is negative, or if scaling by
/// `10^decimals` does not fit 256 bits (a corrupt token list can carry
/// an absurd decimal count).
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::Precision(format!("negative amount: {amount}")));
    }

    let rounded = amount.round_dp_with_strategy(
        u32::from(decimals),
        RoundingStrategy::MidpointAwayFromZero,
    );

    // rounded.scale() <= decimals after round_dp, so the exponent is exact.
    let mantissa = rounded.mantissa().unsigned_abs();
    let shift = u32::from(decimals) - rounded.scale();
    let factor = U256::from(10u64)
        .checked_pow(U256::from(shift))
        .ok_or_else(|| CoreError::Precision(format!("decimals out of range: {decimals}")))?;
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or_else(|| CoreError::Precision(format!("amount overflows 256 bits: {amount}")))
}

/// Convert integer base units back to a decimal amount.
///
/// Inverse of [`to_base_units`] for any amount with at most `decimals`
/// fractional digits. Builds the decimal textually so values larger
/// than any fixed-width integer cannot overflow mid-conversion.
///
/// # Errors
/// `CoreError::DecimalParse` if the value needs more than `Decimal`'s
/// 28 significant digits.
pub fn from_base_units(units: U256, decimals: u8) -> Result<Decimal> {
    let digits = units.to_string();
    if decimals == 0 {
        return Ok(digits.parse()?);
    }

    let decimals = usize::from(decimals);
    let padded = if digits.len() <= decimals {
        format!("0{:0>width$}", digits, width = decimals)
    } else {
        digits
    };
    let split = padded.len() - decimals;
    let text = format!("{}.{}", &padded[..split], &padded[split..]);
    Ok(text.parse::<Decimal>()?.normalize())
}

/// Convert a collaborator-supplied float into an exact `Decimal`.
///
/// # Errors
/// `CoreError::Precision` if the value is NaN, infinite, or negative.
pub fn decimal_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(CoreError::Precision(format!("non-finite amount: {value}")));
    }
    let decimal = Decimal::from_f64(value)
        .ok_or_else(|| CoreError::Precision(format!("unrepresentable amount: {value}")))?;
    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(CoreError::Precision(format!("negative amount: {value}")));
    }
    Ok(decimal)
}
