//! Exact-decimal arithmetic primitives.
//!
//! Every monetary amount in the engine is a [`Decimal`] quantized to
//! [`AMOUNT_SCALE`] places with round-half-up, right after the mechanism that
//! produced it. Independent runs therefore agree digit for digit.

use crate::errors::{EngineError, Result};
use crate::types::{Amount, TimeStep};
use rust_decimal::{Decimal, RoundingStrategy};

/// Canonical scale for token amounts (micro-units).
pub const AMOUNT_SCALE: u32 = 6;

/// Canonical scale for reported percentages.
pub const PERCENT_SCALE: u32 = 2;

fn quantize_to(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    // Pad so every value carries the same textual scale.
    rounded.rescale(scale);
    rounded
}

/// Round an amount half-up to [`AMOUNT_SCALE`] places.
pub fn quantize(value: Decimal) -> Amount {
    quantize_to(value, AMOUNT_SCALE)
}

/// Round a percentage half-up to [`PERCENT_SCALE`] places.
pub fn quantize_percent(value: Decimal) -> Decimal {
    quantize_to(value, PERCENT_SCALE)
}

pub fn checked_add(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal> {
    a.checked_add(b).ok_or(EngineError::CalculationOverflow(context))
}

pub fn checked_sub(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal> {
    a.checked_sub(b).ok_or(EngineError::CalculationOverflow(context))
}

pub fn checked_mul(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or(EngineError::CalculationOverflow(context))
}

/// `value × percentage / 100`, unquantized.
pub fn percent_of(value: Decimal, percentage: Decimal) -> Result<Decimal> {
    let scaled = checked_mul(value, percentage, "percentage product")?;
    Ok(scaled / Decimal::ONE_HUNDRED)
}

/// Convert an annual percentage rate into the rate applied per period.
pub fn period_rate(annual_rate: Decimal, time_step: TimeStep) -> Decimal {
    annual_rate / Decimal::from(time_step.periods_per_year())
}

/// Division that resolves a zero (or overflowing) quotient to zero instead of failing.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

pub fn clamp(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.max(min).min(max)
}

/// Clamp at zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Integer power by square-and-multiply.
pub fn pow(base: Decimal, exponent: u32) -> Result<Decimal> {
    let mut result = Decimal::ONE;
    let mut factor = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = checked_mul(result, factor, "power accumulation")?;
        }
        remaining >>= 1;
        if remaining > 0 {
            factor = checked_mul(factor, factor, "power squaring")?;
        }
    }

    Ok(result)
}
