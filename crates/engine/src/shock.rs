//! One-off supply shocks.
//!
//! A shock fires once, at its period, after the scheduled mechanisms and
//! before staking rebalances. Each kind takes its `fraction` of one balance:
//! burns of circulating supply, spikes of total supply, unlocks of the
//! remaining vesting lock.

use crate::decimal::{checked_mul, quantize};
use crate::errors::Result;
use crate::types::{Amount, Period, ShockEvent, ShockKind};
use rust_decimal::Decimal;

/// Balance change a shock asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShockEffect {
    Burn(Amount),
    Mint(Amount),
    Release(Amount),
}

impl ShockEffect {
    pub fn amount(&self) -> Amount {
        match self {
            ShockEffect::Burn(amount) | ShockEffect::Mint(amount) | ShockEffect::Release(amount) => *amount,
        }
    }
}

/// Shocks scheduled for `period`, in the order they were listed.
pub fn shocks_at(shocks: &[ShockEvent], period: Period) -> impl Iterator<Item = &ShockEvent> {
    shocks.iter().filter(move |shock| shock.period == period)
}

/// Effect of `event` on the balances it sees.
pub fn shock_effect(
    event: &ShockEvent,
    total: Amount,
    circulating: Amount,
    locked: Amount,
) -> Result<ShockEffect> {
    let effect = match event.event_type {
        ShockKind::MassBurn | ShockKind::Buyback => {
            ShockEffect::Burn(quantize(checked_mul(circulating, event.fraction, "shock burn")?))
        }
        ShockKind::InflationSpike => {
            ShockEffect::Mint(quantize(checked_mul(total, event.fraction, "shock mint")?))
        }
        ShockKind::Unlock => {
            ShockEffect::Release(quantize(checked_mul(locked, event.fraction, "shock unlock")?))
        }
    };
    Ok(effect)
}

/// Log line for a fired shock. A configured description replaces the default.
pub fn describe(event: &ShockEvent) -> String {
    if let Some(description) = event.description.as_deref().filter(|d| !d.trim().is_empty()) {
        return description.to_string();
    }

    let percent = (event.fraction * Decimal::ONE_HUNDRED).normalize();
    match event.event_type {
        ShockKind::MassBurn => format!("mass burn of {percent}% of circulating supply"),
        ShockKind::Buyback => format!("buyback and burn of {percent}% of circulating supply"),
        ShockKind::InflationSpike => format!("inflation spike of {percent}% of total supply"),
        ShockKind::Unlock => format!("early unlock of {percent}% of vesting tokens"),
    }
}
