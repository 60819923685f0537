//! Scenario stepper.
//!
//! Runs periods `0..=duration`. Period 0 locks the vesting tranches and takes
//! the initial stake; every later period applies Inflation → Burn → Vesting →
//! Shocks → Staking, each on the state left by the previous step, then appends
//! one snapshot to the timeline.

use crate::decimal::{checked_add, checked_sub, clamp, quantize};
use crate::errors::Result;
use crate::params::validate_scenario;
use crate::shock::{self, ShockEffect};
use crate::staking::{self, StakeAdjustment};
use crate::summary::build_summary;
use crate::types::{
    Amount, Period, PeriodMetrics, ScenarioConfig, ScenarioRun, ShockRecord, Timeline,
};
use crate::{burn, inflation, vesting};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Running balances and cumulative counters of a scenario.
///
/// `circulating_supply + vesting_locked + staked_supply == total_supply`
/// holds after every operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplyState {
    pub total_supply: Amount,
    pub circulating_supply: Amount,
    pub staked_supply: Amount,
    pub vesting_locked: Amount,
    pub total_minted: Amount,
    pub total_burned: Amount,
    pub total_vested: Amount,
    pub total_staking_rewards: Amount,
}

/// What happened during a single period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PeriodFlows {
    minted: Amount,
    burned: Amount,
    vested: Amount,
    staking_rewards: Amount,
}

impl PeriodFlows {
    fn none() -> Self {
        let zero = quantize(Decimal::ZERO);
        Self {
            minted: zero,
            burned: zero,
            vested: zero,
            staking_rewards: zero,
        }
    }
}

impl SupplyState {
    /// State at period 0: vesting tranches locked, initial stake taken.
    pub fn genesis(config: &ScenarioConfig) -> Result<Self> {
        let initial_supply = quantize(config.initial_supply);
        let zero = quantize(Decimal::ZERO);
        let mut state = Self {
            total_supply: initial_supply,
            circulating_supply: initial_supply,
            staked_supply: zero,
            vesting_locked: zero,
            total_minted: zero,
            total_burned: zero,
            total_vested: zero,
            total_staking_rewards: zero,
        };

        if let Some(vesting) = &config.vesting {
            let locked = vesting::locked_total(vesting)?;
            state.circulating_supply =
                checked_sub(state.circulating_supply, locked, "genesis vesting lock")?;
            state.vesting_locked = locked;
        }

        if let Some(staking) = config.active_staking() {
            let stake = staking::initial_stake(initial_supply, state.circulating_supply, staking)?;
            state.move_to_stake(stake)?;
        }

        Ok(state)
    }

    /// Vesting lock plus staked balance.
    pub fn locked_supply(&self) -> Amount {
        self.vesting_locked + self.staked_supply
    }

    fn mint(&mut self, amount: Amount) -> Result<()> {
        self.total_supply = checked_add(self.total_supply, amount, "total supply mint")?;
        self.circulating_supply = checked_add(self.circulating_supply, amount, "circulating mint")?;
        self.total_minted = checked_add(self.total_minted, amount, "total minted")?;
        Ok(())
    }

    fn burn(&mut self, amount: Amount) -> Result<()> {
        let amount = clamp(amount, Decimal::ZERO, self.circulating_supply);
        self.total_supply = checked_sub(self.total_supply, amount, "total supply burn")?;
        self.circulating_supply = checked_sub(self.circulating_supply, amount, "circulating burn")?;
        self.total_burned = checked_add(self.total_burned, amount, "total burned")?;
        Ok(())
    }

    fn release_vested(&mut self, amount: Amount) -> Result<()> {
        let amount = clamp(amount, Decimal::ZERO, self.vesting_locked);
        self.vesting_locked = checked_sub(self.vesting_locked, amount, "vesting lock release")?;
        self.circulating_supply = checked_add(self.circulating_supply, amount, "circulating vest")?;
        self.total_vested = checked_add(self.total_vested, amount, "total vested")?;
        Ok(())
    }

    fn move_to_stake(&mut self, amount: Amount) -> Result<()> {
        let amount = clamp(amount, Decimal::ZERO, self.circulating_supply);
        self.circulating_supply = checked_sub(self.circulating_supply, amount, "circulating stake")?;
        self.staked_supply = checked_add(self.staked_supply, amount, "staked supply")?;
        Ok(())
    }

    fn move_from_stake(&mut self, amount: Amount) -> Result<()> {
        let amount = clamp(amount, Decimal::ZERO, self.staked_supply);
        self.staked_supply = checked_sub(self.staked_supply, amount, "staked supply unstake")?;
        self.circulating_supply = checked_add(self.circulating_supply, amount, "circulating unstake")?;
        Ok(())
    }

    /// Apply one period's mechanisms in their fixed order. Fired shocks are
    /// appended to `events`.
    fn step(
        &mut self,
        config: &ScenarioConfig,
        period: Period,
        events: &mut Vec<ShockRecord>,
    ) -> Result<PeriodFlows> {
        let mut flows = PeriodFlows::none();

        if let Some(schedule) = &config.inflation {
            let minted = inflation::inflation_for_period(self.total_supply, schedule, period, config.time_step)?;
            self.mint(minted)?;
            flows.minted = minted;
        }

        if let Some(schedule) = &config.burn {
            let burned = burn::burn_for_period(self.circulating_supply, schedule, period, config.time_step)?;
            self.burn(burned)?;
            flows.burned = burned;
        }

        if let Some(schedule) = &config.vesting {
            let vested = vesting::vesting_for_period(schedule, period, self.vesting_locked)?;
            self.release_vested(vested)?;
            flows.vested = vested;
        }

        for event in shock::shocks_at(&config.shocks, period) {
            let effect =
                shock::shock_effect(event, self.total_supply, self.circulating_supply, self.vesting_locked)?;
            let amount = match effect {
                ShockEffect::Burn(amount) => {
                    let amount = clamp(amount, Decimal::ZERO, self.circulating_supply);
                    self.burn(amount)?;
                    flows.burned = checked_add(flows.burned, amount, "period burned")?;
                    amount
                }
                ShockEffect::Mint(amount) => {
                    self.mint(amount)?;
                    flows.minted = checked_add(flows.minted, amount, "period minted")?;
                    amount
                }
                ShockEffect::Release(amount) => {
                    let amount = clamp(amount, Decimal::ZERO, self.vesting_locked);
                    self.release_vested(amount)?;
                    flows.vested = checked_add(flows.vested, amount, "period vested")?;
                    amount
                }
            };

            let message = shock::describe(event);
            info!(
                "Shock at period {}: {} ({}), amount={}, total_supply={}",
                period,
                event.event_type.as_str(),
                message,
                amount,
                self.total_supply
            );
            events.push(ShockRecord {
                period,
                event_type: event.event_type,
                amount,
                total_supply: self.total_supply,
                message,
            });
        }

        if let Some(staking_config) = config.active_staking() {
            let rewards = staking::staking_rewards(self.staked_supply, staking_config, config.time_step)?;
            self.mint(rewards)?;
            self.total_staking_rewards =
                checked_add(self.total_staking_rewards, rewards, "total staking rewards")?;
            flows.minted = checked_add(flows.minted, rewards, "period minted")?;
            flows.staking_rewards = rewards;

            let target = staking::staking_target(self.total_supply, staking_config)?;
            let adjustment = staking_config.rebalance.adjustment(
                self.staked_supply,
                target,
                self.circulating_supply,
                staking::is_unlocked(staking_config, period),
            )?;
            match adjustment {
                StakeAdjustment::Stake(amount) => self.move_to_stake(amount)?,
                StakeAdjustment::Unstake(amount) => self.move_from_stake(amount)?,
                StakeAdjustment::Hold => {}
            }
        }

        Ok(flows)
    }

    fn snapshot(&self, period: Period, flows: &PeriodFlows) -> PeriodMetrics {
        PeriodMetrics {
            period,
            total_supply: self.total_supply,
            circulating_supply: self.circulating_supply,
            minted_amount: flows.minted,
            burned_amount: flows.burned,
            vested_amount: flows.vested,
            staked_amount: self.staked_supply,
            staking_rewards: flows.staking_rewards,
            locked_amount: self.locked_supply(),
            cumulative_minted: self.total_minted,
            cumulative_burned: self.total_burned,
            cumulative_vested: self.total_vested,
            cumulative_staking_rewards: self.total_staking_rewards,
        }
    }
}

/// Simulate a scenario and summarize it.
///
/// The config is validated first; an invalid one is rejected before any
/// period runs. The result depends only on `config`.
pub fn simulate_scenario(config: &ScenarioConfig) -> Result<ScenarioRun> {
    validate_scenario(config)?;

    info!(
        "Simulating scenario: initial_supply={}, time_step={}, duration={}",
        config.initial_supply,
        config.time_step.as_str(),
        config.duration
    );

    let mut state = SupplyState::genesis(config)?;
    let mut timeline = Timeline::with_capacity(config.duration as usize + 1);
    let mut events = Vec::new();
    timeline.push(state.snapshot(0, &PeriodFlows::none()));

    for period in 1..=config.duration {
        let flows = state.step(config, period, &mut events)?;
        let metrics = state.snapshot(period, &flows);
        debug!(
            "Period {}: total={}, circulating={}, staked={}, locked={}",
            period,
            metrics.total_supply,
            metrics.circulating_supply,
            metrics.staked_amount,
            metrics.locked_amount
        );
        timeline.push(metrics);
    }

    let summary = build_summary(&timeline)?;
    info!(
        "Scenario complete: final_supply={}, change={}%, shocks={}",
        summary.final_supply,
        summary.supply_change_percentage,
        events.len()
    );

    Ok(ScenarioRun {
        timeline,
        summary,
        events,
    })
}
