//! Summary builder: reduces a finished timeline to its aggregate outcome.

use crate::decimal::{checked_mul, checked_sub, quantize_percent, safe_divide};
use crate::errors::{EngineError, Result};
use crate::types::{Amount, ScenarioSummary, Timeline};
use rust_decimal::Decimal;

/// Relative change between two supplies in percent, two decimals.
/// A zero starting supply yields zero instead of an error.
pub fn supply_change_percentage(initial: Amount, final_supply: Amount) -> Result<Decimal> {
    let delta = checked_sub(final_supply, initial, "supply change delta")?;
    let ratio = safe_divide(delta, initial);
    Ok(quantize_percent(checked_mul(ratio, Decimal::ONE_HUNDRED, "supply change percentage")?))
}

/// Build the summary of a completed timeline.
///
/// Reads the first and last snapshots only; the cumulative fields of the last
/// snapshot already carry every flow of the run.
pub fn build_summary(timeline: &Timeline) -> Result<ScenarioSummary> {
    let (first, last) = match (timeline.first(), timeline.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(EngineError::invalid("cannot summarize an empty timeline")),
    };

    Ok(ScenarioSummary {
        initial_supply: first.total_supply,
        final_supply: last.total_supply,
        total_minted: last.cumulative_minted,
        total_burned: last.cumulative_burned,
        total_vested: last.cumulative_vested,
        total_staking_rewards: last.cumulative_staking_rewards,
        current_staked: last.staked_amount,
        current_locked: last.locked_amount,
        supply_change_percentage: supply_change_percentage(first.total_supply, last.total_supply)?,
    })
}
