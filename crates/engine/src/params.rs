//! Scenario parameter validation.
//!
//! Every rejection happens here, before the first period is simulated, so the
//! stepper never has to partially apply or silently default a config.

use crate::decimal::{quantize, AMOUNT_SCALE};
use crate::errors::{EngineError, Result};
use crate::vesting::locked_total;
use crate::types::{
    BurnConfig, InflationConfig, RebalancePolicy, ScenarioConfig, ShockEvent, StakingConfig,
    VestingConfig,
};
use rust_decimal::Decimal;

/// Highest annual staking reward rate accepted (%).
pub const MAX_REWARD_RATE: u32 = 1000;

fn check_rate(name: &str, value: Decimal, max: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > max {
        return Err(EngineError::invalid(format!(
            "{name} must be between 0 and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_percentage(name: &str, value: Decimal) -> Result<()> {
    check_rate(name, value, Decimal::ONE_HUNDRED)
}

/// Validate a scenario, rejecting it with `InvalidConfiguration` on the first problem found.
pub fn validate_scenario(config: &ScenarioConfig) -> Result<()> {
    if quantize(config.initial_supply) <= Decimal::ZERO {
        return Err(EngineError::invalid(format!(
            "initial_supply must be positive at {} decimal places, got {}",
            AMOUNT_SCALE, config.initial_supply
        )));
    }

    let max_duration = config.time_step.max_duration();
    if config.duration == 0 || config.duration > max_duration {
        return Err(EngineError::invalid(format!(
            "duration must be between 1 and {} {} periods, got {}",
            max_duration,
            config.time_step.as_str(),
            config.duration
        )));
    }

    if !config.has_mechanism() {
        return Err(EngineError::invalid(
            "at least one mechanism (inflation, burn, vesting, staking or shocks) must be configured",
        ));
    }

    if let Some(inflation) = &config.inflation {
        validate_inflation(inflation)?;
    }
    if let Some(burn) = &config.burn {
        validate_burn(burn)?;
    }
    if let Some(vesting) = &config.vesting {
        validate_vesting(vesting, config.initial_supply)?;
    }
    if let Some(staking) = &config.staking {
        validate_staking(staking)?;
    }
    validate_shocks(&config.shocks)?;

    Ok(())
}

fn validate_inflation(config: &InflationConfig) -> Result<()> {
    check_percentage("inflation initial_rate", config.initial_rate())?;

    match config {
        InflationConfig::Constant { .. } => {}
        InflationConfig::Dynamic {
            initial_rate,
            min_rate,
            decay_rate,
        } => {
            check_percentage("inflation min_rate", *min_rate)?;
            check_percentage("inflation decay_rate", *decay_rate)?;
            if min_rate > initial_rate {
                return Err(EngineError::invalid(format!(
                    "inflation min_rate {min_rate} exceeds initial_rate {initial_rate}"
                )));
            }
        }
        InflationConfig::Halving { halving_period, .. } => {
            if *halving_period == 0 {
                return Err(EngineError::invalid("inflation halving_period must be positive"));
            }
        }
    }

    Ok(())
}

fn validate_burn(config: &BurnConfig) -> Result<()> {
    match config {
        BurnConfig::Continuous { rate } => check_percentage("burn rate", *rate),
        BurnConfig::EventBased { events } => {
            if events.is_empty() {
                return Err(EngineError::invalid(
                    "burn config must specify either a rate or events",
                ));
            }
            for event in events {
                if event.period == 0 {
                    return Err(EngineError::invalid(
                        "burn events must be scheduled at period 1 or later",
                    ));
                }
                if event.amount <= Decimal::ZERO {
                    return Err(EngineError::invalid(format!(
                        "burn event at period {} must have a positive amount, got {}",
                        event.period, event.amount
                    )));
                }
            }
            Ok(())
        }
    }
}

fn validate_vesting(config: &VestingConfig, initial_supply: Decimal) -> Result<()> {
    if config.periods.is_empty() {
        return Err(EngineError::invalid("vesting config requires at least one period"));
    }

    for (index, tranche) in config.periods.iter().enumerate() {
        if tranche.duration == 0 {
            return Err(EngineError::invalid(format!(
                "vesting period {index} must have a positive duration"
            )));
        }
        if quantize(tranche.amount) <= Decimal::ZERO {
            return Err(EngineError::invalid(format!(
                "vesting period {index} must have a positive amount, got {}",
                tranche.amount
            )));
        }
    }

    let total = locked_total(config)?;
    if total > quantize(initial_supply) {
        return Err(EngineError::invalid(format!(
            "vesting amounts total {total}, more than the initial supply {initial_supply}"
        )));
    }

    Ok(())
}

fn validate_staking(config: &StakingConfig) -> Result<()> {
    check_percentage("staking target_rate", config.target_rate)?;
    check_rate(
        "staking reward_rate",
        config.reward_rate,
        Decimal::from(MAX_REWARD_RATE),
    )?;

    if let RebalancePolicy::Gradual { step_percent } = &config.rebalance {
        if *step_percent <= Decimal::ZERO || *step_percent > Decimal::ONE_HUNDRED {
            return Err(EngineError::invalid(format!(
                "gradual rebalance step_percent must be in (0, 100], got {step_percent}"
            )));
        }
    }

    Ok(())
}

fn validate_shocks(shocks: &[ShockEvent]) -> Result<()> {
    for shock in shocks {
        if shock.period == 0 {
            return Err(EngineError::invalid(format!(
                "{} shock must be scheduled at period 1 or later",
                shock.event_type.as_str()
            )));
        }
        if shock.fraction < Decimal::ZERO || shock.fraction > Decimal::ONE {
            return Err(EngineError::invalid(format!(
                "{} shock at period {} must have a fraction between 0 and 1, got {}",
                shock.event_type.as_str(),
                shock.period,
                shock.fraction
            )));
        }
    }
    Ok(())
}
