//! Tokensim Engine: Token Supply Scenario Simulation
//!
//! Deterministic period-stepped projection of a token's supply under
//! inflation, burn, vesting and staking mechanisms plus one-off supply
//! shocks, with summaries and side-by-side comparison of several scenarios.
//!
//! Monetary unit: exact decimals quantized to micro-units (6 places).

pub mod types;
pub mod errors;
pub mod decimal;
pub mod params;
pub mod inflation;
pub mod burn;
pub mod vesting;
pub mod staking;
pub mod shock;
pub mod simulation;
pub mod summary;
pub mod comparison;
pub mod projection;

pub use types::*;
pub use errors::*;
pub use params::*;
pub use simulation::*;
pub use summary::*;
pub use comparison::*;
pub use projection::*;
pub use staking::StakeAdjustment;
pub use shock::ShockEffect;

/// Everything an embedder needs to build, run and compare scenarios.
pub mod prelude {
    pub use crate::comparison::{compare_scenarios, ComparisonReport, ComparisonSummary, Range, ScenarioOutcome};
    pub use crate::decimal::{quantize, AMOUNT_SCALE, PERCENT_SCALE};
    pub use crate::errors::{EngineError, Result};
    pub use crate::params::validate_scenario;
    pub use crate::projection::{project_constant_inflation, supply_increase, SupplyIncrease, SupplyPoint};
    pub use crate::simulation::simulate_scenario;
    pub use crate::summary::build_summary;
    pub use crate::types::*;
    pub use rust_decimal::Decimal;
}
