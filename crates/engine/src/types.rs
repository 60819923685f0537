//! Core types for the Tokensim scenario engine
//!
//! Defines monetary amounts, period indices, the immutable scenario
//! configuration with its four mechanism configs and one-off shock events,
//! and the per-period and aggregate records the engine hands back.

use crate::errors::EngineError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Simulation step index. Period 0 is the initial state.
pub type Period = u32;

/// Token amount, always an exact decimal.
pub type Amount = Decimal;

/// Longest monthly scenario accepted (30 years).
pub const MAX_MONTHLY_PERIODS: Period = 360;

/// Longest yearly scenario accepted.
pub const MAX_YEARLY_PERIODS: Period = 30;

/// Length of one simulation period
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStep {
    #[default]
    Monthly,
    Yearly,
}

impl TimeStep {
    /// Number of periods that make up one year; annual rates are divided by this.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            TimeStep::Monthly => 12,
            TimeStep::Yearly => 1,
        }
    }

    /// Upper bound on `duration` for this step.
    pub fn max_duration(&self) -> Period {
        match self {
            TimeStep::Monthly => MAX_MONTHLY_PERIODS,
            TimeStep::Yearly => MAX_YEARLY_PERIODS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeStep::Monthly => "monthly",
            TimeStep::Yearly => "yearly",
        }
    }
}

/// Inflation schedule. All rates are annual percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InflationConfig {
    /// Fixed rate for the whole scenario
    Constant { initial_rate: Decimal },
    /// Rate decaying geometrically each period, floored at `min_rate`
    Dynamic {
        initial_rate: Decimal,
        min_rate: Decimal,
        /// Percentage decay applied once per elapsed period
        decay_rate: Decimal,
    },
    /// Rate halved every `halving_period` periods
    Halving {
        initial_rate: Decimal,
        halving_period: Period,
    },
}

impl InflationConfig {
    pub fn initial_rate(&self) -> Decimal {
        match self {
            InflationConfig::Constant { initial_rate }
            | InflationConfig::Dynamic { initial_rate, .. }
            | InflationConfig::Halving { initial_rate, .. } => *initial_rate,
        }
    }
}

/// One-off burn scheduled at a given period
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnEvent {
    #[serde(alias = "month")]
    pub period: Period,
    pub amount: Amount,
}

/// Burn mechanism: either a continuous annual rate on circulating supply or a
/// list of scheduled events. On the wire it is `{ rate }` or `{ events }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BurnConfigRepr", into = "BurnConfigRepr")]
pub enum BurnConfig {
    Continuous { rate: Decimal },
    EventBased { events: Vec<BurnEvent> },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct BurnConfigRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events: Option<Vec<BurnEvent>>,
}

impl TryFrom<BurnConfigRepr> for BurnConfig {
    type Error = EngineError;

    fn try_from(repr: BurnConfigRepr) -> Result<Self, Self::Error> {
        match (repr.rate, repr.events) {
            (Some(rate), None) => Ok(BurnConfig::Continuous { rate }),
            (None, Some(events)) => Ok(BurnConfig::EventBased { events }),
            (Some(_), Some(_)) => Err(EngineError::invalid(
                "burn config must specify either a rate or events, not both",
            )),
            (None, None) => Err(EngineError::invalid(
                "burn config must specify either a rate or events",
            )),
        }
    }
}

impl From<BurnConfig> for BurnConfigRepr {
    fn from(config: BurnConfig) -> Self {
        match config {
            BurnConfig::Continuous { rate } => Self {
                rate: Some(rate),
                events: None,
            },
            BurnConfig::EventBased { events } => Self {
                rate: None,
                events: Some(events),
            },
        }
    }
}

/// Kind of one-off supply shock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockKind {
    /// Burn a fraction of circulating supply
    MassBurn,
    /// Buy back a fraction of circulating supply and burn it
    Buyback,
    /// Mint a fraction of total supply into circulation
    InflationSpike,
    /// Release a fraction of the vesting lock ahead of schedule
    Unlock,
}

impl ShockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShockKind::MassBurn => "mass_burn",
            ShockKind::Buyback => "buyback",
            ShockKind::InflationSpike => "inflation_spike",
            ShockKind::Unlock => "unlock",
        }
    }
}

/// One-off shock applied at `period`. `fraction` is a share in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockEvent {
    #[serde(alias = "time_step")]
    pub period: Period,
    pub event_type: ShockKind,
    #[serde(alias = "value")]
    pub fraction: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ShockEvent {
    pub fn new(period: Period, event_type: ShockKind, fraction: Decimal) -> Self {
        Self {
            period,
            event_type,
            fraction,
            description: None,
        }
    }
}

/// Log entry for a shock that fired during a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockRecord {
    pub period: Period,
    pub event_type: ShockKind,
    /// Tokens burned, minted or released by the shock
    pub amount: Amount,
    /// Total supply right after the shock
    pub total_supply: Amount,
    pub message: String,
}

/// Release curve of a vesting tranche. Only linear release is modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    #[default]
    Linear,
}

/// A locked tranche released linearly after an optional cliff
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingPeriod {
    pub start_period: Period,
    pub duration: Period,
    pub amount: Amount,
    #[serde(default)]
    pub cliff_duration: Period,
    #[serde(default)]
    pub release_type: ReleaseType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingConfig {
    pub periods: Vec<VestingPeriod>,
}

impl VestingConfig {
    /// Sum of all tranche amounts, locked at period 0.
    pub fn total_amount(&self) -> Amount {
        self.periods.iter().map(|p| p.amount).sum()
    }
}

/// How the staked balance moves toward its target each period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RebalancePolicy {
    /// Jump straight to target, bounded by what is available
    #[default]
    FullJump,
    /// Close only `step_percent`% of the gap per period
    Gradual { step_percent: Decimal },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StakingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Desired share of total supply held staked (%)
    pub target_rate: Decimal,
    /// Annual reward rate on the staked balance (%)
    pub reward_rate: Decimal,
    /// Periods during which unstaking toward target is forbidden
    pub lock_duration: Period,
    #[serde(default)]
    pub rebalance: RebalancePolicy,
}

fn default_enabled() -> bool {
    true
}

/// Complete, immutable description of one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub initial_supply: Amount,
    #[serde(default)]
    pub time_step: TimeStep,
    pub duration: Period,
    #[serde(default, alias = "inflation_config", skip_serializing_if = "Option::is_none")]
    pub inflation: Option<InflationConfig>,
    #[serde(default, alias = "burn_config", skip_serializing_if = "Option::is_none")]
    pub burn: Option<BurnConfig>,
    #[serde(default, alias = "vesting_config", skip_serializing_if = "Option::is_none")]
    pub vesting: Option<VestingConfig>,
    #[serde(default, alias = "staking_config", skip_serializing_if = "Option::is_none")]
    pub staking: Option<StakingConfig>,
    #[serde(default, alias = "shock_events", skip_serializing_if = "Vec::is_empty")]
    pub shocks: Vec<ShockEvent>,
}

impl ScenarioConfig {
    /// Start a scenario with no mechanisms; add at least one before simulating.
    pub fn new(initial_supply: Amount, time_step: TimeStep, duration: Period) -> Self {
        Self {
            initial_supply,
            time_step,
            duration,
            inflation: None,
            burn: None,
            vesting: None,
            staking: None,
            shocks: Vec::new(),
        }
    }

    pub fn with_inflation(mut self, inflation: InflationConfig) -> Self {
        self.inflation = Some(inflation);
        self
    }

    pub fn with_burn(mut self, burn: BurnConfig) -> Self {
        self.burn = Some(burn);
        self
    }

    pub fn with_vesting(mut self, vesting: VestingConfig) -> Self {
        self.vesting = Some(vesting);
        self
    }

    pub fn with_staking(mut self, staking: StakingConfig) -> Self {
        self.staking = Some(staking);
        self
    }

    pub fn with_shocks(mut self, shocks: Vec<ShockEvent>) -> Self {
        self.shocks = shocks;
        self
    }

    /// True when any mechanism or shock event is configured.
    pub fn has_mechanism(&self) -> bool {
        self.inflation.is_some()
            || self.burn.is_some()
            || self.vesting.is_some()
            || self.staking.is_some()
            || !self.shocks.is_empty()
    }

    /// Staking config, only when present and enabled.
    pub fn active_staking(&self) -> Option<&StakingConfig> {
        self.staking.as_ref().filter(|s| s.enabled)
    }
}

/// Scenario labelled for comparison
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub config: ScenarioConfig,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, config: ScenarioConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Snapshot of one period. Flow fields hold what happened during the period;
/// balance and `cumulative_*` fields hold the state at its end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub period: Period,
    pub total_supply: Amount,
    pub circulating_supply: Amount,
    /// Inflation plus staking rewards minted this period
    pub minted_amount: Amount,
    pub burned_amount: Amount,
    pub vested_amount: Amount,
    /// Staked balance at period end
    pub staked_amount: Amount,
    pub staking_rewards: Amount,
    /// Vesting lock plus staked balance at period end
    pub locked_amount: Amount,
    pub cumulative_minted: Amount,
    pub cumulative_burned: Amount,
    pub cumulative_vested: Amount,
    pub cumulative_staking_rewards: Amount,
}

/// Ordered, append-only sequence of period snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(Vec<PeriodMetrics>);

impl Timeline {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, metrics: PeriodMetrics) {
        debug_assert_eq!(metrics.period as usize, self.0.len());
        self.0.push(metrics);
    }

    pub fn as_slice(&self) -> &[PeriodMetrics] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodMetrics> {
        self.0.iter()
    }

    pub fn get(&self, period: Period) -> Option<&PeriodMetrics> {
        self.0.get(period as usize)
    }

    pub fn first(&self) -> Option<&PeriodMetrics> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&PeriodMetrics> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a PeriodMetrics;
    type IntoIter = std::slice::Iter<'a, PeriodMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Aggregate outcome of a finished scenario
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub initial_supply: Amount,
    pub final_supply: Amount,
    pub total_minted: Amount,
    pub total_burned: Amount,
    pub total_vested: Amount,
    pub total_staking_rewards: Amount,
    pub current_staked: Amount,
    pub current_locked: Amount,
    pub supply_change_percentage: Decimal,
}

/// Timeline, summary and shock log of one simulated scenario
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRun {
    pub timeline: Timeline,
    pub summary: ScenarioSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ShockRecord>,
}
