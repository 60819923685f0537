//! Burn calculator.

use crate::decimal::{checked_add, non_negative, percent_of, period_rate, quantize};
use crate::errors::Result;
use crate::types::{Amount, BurnConfig, Period, TimeStep};
use rust_decimal::Decimal;
use tracing::warn;

/// Amount requested by the burn schedule for `period`, before clamping.
pub fn scheduled_burn(
    circulating: Amount,
    config: &BurnConfig,
    period: Period,
    time_step: TimeStep,
) -> Result<Amount> {
    match config {
        BurnConfig::Continuous { rate } => {
            let rate = period_rate(*rate, time_step);
            Ok(quantize(percent_of(circulating, rate)?))
        }
        BurnConfig::EventBased { events } => {
            let mut total = Decimal::ZERO;
            for event in events.iter().filter(|e| e.period == period) {
                total = checked_add(total, event.amount, "burn event sum")?;
            }
            Ok(quantize(total))
        }
    }
}

/// Tokens burned during `period`. Never more than the circulating supply.
pub fn burn_for_period(
    circulating: Amount,
    config: &BurnConfig,
    period: Period,
    time_step: TimeStep,
) -> Result<Amount> {
    let requested = scheduled_burn(circulating, config, period, time_step)?;
    if requested > circulating {
        warn!(
            "Burn at period {} clamped to circulating supply: requested={}, available={}",
            period, requested, circulating
        );
        return Ok(non_negative(circulating));
    }
    Ok(requested)
}
