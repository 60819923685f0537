//! Vesting calculator.
//!
//! Each tranche is locked at period 0 and released linearly after its cliff.
//! A release is the difference between two quantized cumulative accruals, so
//! the releases of a tranche always add up to exactly its quantized `amount`.

use crate::decimal::{checked_add, checked_mul, checked_sub, non_negative, quantize};
use crate::errors::Result;
use crate::types::{Amount, Period, VestingConfig, VestingPeriod};
use rust_decimal::Decimal;
use tracing::warn;

/// Cumulative amount of `tranche` released once `elapsed` periods have passed
/// since its start.
///
/// Zero before the cliff. From the cliff on, `amount × min(elapsed, duration) / duration`,
/// which releases the accrued cliff share as a lump at the cliff boundary and
/// `amount / duration` every period after it. A cliff at or beyond the
/// duration therefore releases everything at once.
pub fn accrued(tranche: &VestingPeriod, elapsed: Period) -> Result<Amount> {
    if elapsed < tranche.cliff_duration || tranche.duration == 0 {
        return Ok(Decimal::ZERO);
    }
    if elapsed >= tranche.duration {
        return Ok(quantize(tranche.amount));
    }

    let share = checked_mul(tranche.amount, Decimal::from(elapsed), "vesting accrual")?;
    Ok(quantize(share / Decimal::from(tranche.duration)))
}

/// Balance locked at period 0: the sum of the quantized tranche amounts, so
/// the lock matches what the tranches release in full.
pub fn locked_total(config: &VestingConfig) -> Result<Amount> {
    let mut total = quantize(Decimal::ZERO);
    for tranche in &config.periods {
        total = checked_add(total, quantize(tranche.amount), "vesting lock total")?;
    }
    Ok(total)
}

/// Amount `tranche` releases during `period`.
pub fn tranche_release(tranche: &VestingPeriod, period: Period) -> Result<Amount> {
    if period < tranche.start_period {
        return Ok(Decimal::ZERO);
    }

    let elapsed = period - tranche.start_period;
    if elapsed == 0 {
        return accrued(tranche, 0);
    }

    let now = accrued(tranche, elapsed)?;
    let before = accrued(tranche, elapsed - 1)?;
    checked_sub(now, before, "vesting release")
}

/// Total released across all tranches during `period`, never more than `locked`.
pub fn vesting_for_period(config: &VestingConfig, period: Period, locked: Amount) -> Result<Amount> {
    let mut total = Decimal::ZERO;
    for tranche in &config.periods {
        total = checked_add(total, tranche_release(tranche, period)?, "vesting sum")?;
    }

    if total > locked {
        warn!(
            "Vesting at period {} clamped to locked balance: scheduled={}, locked={}",
            period, total, locked
        );
        return Ok(non_negative(locked));
    }

    Ok(total)
}
