//! Inflation calculator.
//!
//! Handles constant, geometrically decaying and halving schedules. The rate
//! for a period is always derived from the immutable config and the elapsed
//! period count, never from state carried between periods.

use crate::decimal::{self, percent_of, period_rate, quantize};
use crate::errors::{EngineError, Result};
use crate::types::{Amount, InflationConfig, Period, TimeStep};
use rust_decimal::Decimal;

/// Largest power of two divided out in one step; `2^64` fits in a `Decimal`.
const HALVING_CHUNK: u32 = 64;

/// Annual inflation rate (%) in effect after `elapsed` periods.
///
/// - constant: `initial_rate`
/// - dynamic: `max(min_rate, initial_rate × (1 − decay_rate/100)^elapsed)`
/// - halving: `initial_rate / 2^⌊elapsed / halving_period⌋`
pub fn annual_rate(config: &InflationConfig, elapsed: Period) -> Result<Decimal> {
    match config {
        InflationConfig::Constant { initial_rate } => Ok(*initial_rate),
        InflationConfig::Dynamic {
            initial_rate,
            min_rate,
            decay_rate,
        } => {
            let retained = Decimal::ONE - *decay_rate / Decimal::ONE_HUNDRED;
            let factor = decimal::pow(retained, elapsed)?;
            let decayed = decimal::checked_mul(*initial_rate, factor, "dynamic inflation decay")?;
            Ok(decayed.max(*min_rate))
        }
        InflationConfig::Halving {
            initial_rate,
            halving_period,
        } => {
            let halvings = elapsed / (*halving_period).max(1);
            halved_rate(*initial_rate, halvings)
        }
    }
}

/// `rate / 2^halvings` at `Decimal` resolution (28 places). Past roughly 100
/// halvings of a 100% rate the quotient underflows to zero.
fn halved_rate(rate: Decimal, halvings: u32) -> Result<Decimal> {
    let mut rate = rate;
    let mut remaining = halvings;
    while remaining > 0 && !rate.is_zero() {
        let step = remaining.min(HALVING_CHUNK);
        let divisor = decimal::pow(Decimal::TWO, step)?;
        rate = rate
            .checked_div(divisor)
            .ok_or(EngineError::CalculationOverflow("halving division"))?;
        remaining -= step;
    }
    Ok(rate)
}

/// Tokens minted during period `elapsed` on top of `supply`, quantized.
pub fn inflation_for_period(
    supply: Amount,
    config: &InflationConfig,
    elapsed: Period,
    time_step: TimeStep,
) -> Result<Amount> {
    let rate = period_rate(annual_rate(config, elapsed)?, time_step);
    Ok(quantize(percent_of(supply, rate)?))
}
