//! Staking calculator.
//!
//! Rewards are paid on the balance carried over from the previous period.
//! Moving the staked balance toward its target goes through
//! [`RebalancePolicy::adjustment`], the only place that decides how fast the
//! stake follows the target.

use crate::decimal::{clamp, percent_of, period_rate, quantize};
use crate::errors::Result;
use crate::types::{Amount, Period, RebalancePolicy, StakingConfig, TimeStep};
use rust_decimal::Decimal;
use tracing::warn;

/// Direction and size of the stake change for one period
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeAdjustment {
    /// Move this amount from circulating to staked
    Stake(Amount),
    /// Move this amount from staked back to circulating
    Unstake(Amount),
    Hold,
}

/// Staked balance established at period 0: `target_rate`% of the initial
/// supply, bounded by what is circulating.
pub fn initial_stake(
    initial_supply: Amount,
    circulating: Amount,
    config: &StakingConfig,
) -> Result<Amount> {
    let target = quantize(percent_of(initial_supply, config.target_rate)?);
    Ok(clamp(target, Decimal::ZERO, circulating))
}

/// Rewards minted on `staked` (the previous period's closing balance).
pub fn staking_rewards(staked: Amount, config: &StakingConfig, time_step: TimeStep) -> Result<Amount> {
    let rate = period_rate(config.reward_rate, time_step);
    Ok(quantize(percent_of(staked, rate)?))
}

/// Stake the target rate asks for given the current total supply.
pub fn staking_target(total_supply: Amount, config: &StakingConfig) -> Result<Amount> {
    Ok(quantize(percent_of(total_supply, config.target_rate)?))
}

/// Unstaking is only permitted once more than `lock_duration` periods have elapsed.
pub fn is_unlocked(config: &StakingConfig, elapsed: Period) -> bool {
    elapsed > config.lock_duration
}

impl RebalancePolicy {
    /// Decide how the staked balance moves toward `target` this period.
    ///
    /// Staking up is bounded by `circulating`; staking down never goes below
    /// the target or below zero, and is refused while `unlocked` is false.
    pub fn adjustment(
        &self,
        staked: Amount,
        target: Amount,
        circulating: Amount,
        unlocked: bool,
    ) -> Result<StakeAdjustment> {
        if staked < target {
            let gap = self.step(target - staked)?;
            if gap > circulating {
                warn!(
                    "Stake top-up bounded by circulating supply: wanted={}, available={}",
                    gap, circulating
                );
            }
            let amount = gap.min(circulating);
            if amount > Decimal::ZERO {
                return Ok(StakeAdjustment::Stake(amount));
            }
        } else if staked > target && unlocked {
            let excess = self.step(staked - target)?;
            let amount = excess.min(staked);
            if amount > Decimal::ZERO {
                return Ok(StakeAdjustment::Unstake(amount));
            }
        }

        Ok(StakeAdjustment::Hold)
    }

    fn step(&self, gap: Amount) -> Result<Amount> {
        match self {
            RebalancePolicy::FullJump => Ok(gap),
            RebalancePolicy::Gradual { step_percent } => Ok(quantize(percent_of(gap, *step_percent)?)),
        }
    }
}
