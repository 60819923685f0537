//! Scenario comparator.
//!
//! Runs 2 to 5 named scenarios independently and reduces their summaries to
//! min/max/avg ranges. The first failing scenario aborts the whole comparison.

use crate::decimal::{checked_add, quantize, quantize_percent};
use crate::errors::{EngineError, Result};
use crate::simulation::simulate_scenario;
use crate::types::{NamedScenario, ScenarioSummary, ShockRecord, Timeline};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Fewest scenarios a comparison accepts.
pub const MIN_SCENARIOS: usize = 2;

/// Most scenarios a comparison accepts.
pub const MAX_SCENARIOS: usize = 5;

/// Longest scenario name accepted.
pub const MAX_NAME_LENGTH: usize = 50;

/// Spread of one summary field across scenarios
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: Decimal,
    pub max: Decimal,
    pub avg: Decimal,
}

impl Range {
    /// Reduce `values`, rounding the average with `round`.
    fn from_values<I>(values: I, round: fn(Decimal) -> Decimal) -> Result<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut iter = values.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| EngineError::InvalidComparison("no outcomes to summarize".into()))?;

        let (mut min, mut max, mut sum, mut count) = (first, first, first, 1u32);
        for value in iter {
            min = min.min(value);
            max = max.max(value);
            sum = checked_add(sum, value, "comparison range sum")?;
            count += 1;
        }

        Ok(Self {
            min,
            max,
            avg: round(sum / Decimal::from(count)),
        })
    }

    pub fn as_tuple(&self) -> (Decimal, Decimal) {
        (self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub supply_range: Range,
    pub minted_range: Range,
    pub burned_range: Range,
    pub staked_range: Range,
    pub supply_change_range: Range,
}

/// Result of one scenario within a comparison
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub timeline: Timeline,
    pub summary: ScenarioSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ShockRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub scenarios: Vec<ScenarioOutcome>,
    pub summary: ComparisonSummary,
}

fn validate_names(scenarios: &[NamedScenario]) -> Result<()> {
    if scenarios.len() < MIN_SCENARIOS || scenarios.len() > MAX_SCENARIOS {
        return Err(EngineError::InvalidComparison(format!(
            "between {} and {} scenarios are required, got {}",
            MIN_SCENARIOS,
            MAX_SCENARIOS,
            scenarios.len()
        )));
    }

    let mut seen = HashSet::new();
    for scenario in scenarios {
        let name = scenario.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidComparison(
                "scenario names must not be empty".into(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(EngineError::InvalidComparison(format!(
                "scenario name '{}' exceeds {} characters",
                name, MAX_NAME_LENGTH
            )));
        }
        if !seen.insert(name) {
            return Err(EngineError::InvalidComparison(format!(
                "duplicate scenario name '{}'",
                name
            )));
        }
    }

    Ok(())
}

/// Reduce scenario summaries into per-field ranges.
pub fn summarize_comparison(outcomes: &[ScenarioOutcome]) -> Result<ComparisonSummary> {
    let field = |f: fn(&ScenarioSummary) -> Decimal, round: fn(Decimal) -> Decimal| {
        Range::from_values(outcomes.iter().map(|o| f(&o.summary)), round)
    };

    Ok(ComparisonSummary {
        supply_range: field(|s| s.final_supply, quantize)?,
        minted_range: field(|s| s.total_minted, quantize)?,
        burned_range: field(|s| s.total_burned, quantize)?,
        staked_range: field(|s| s.current_staked, quantize)?,
        supply_change_range: field(|s| s.supply_change_percentage, quantize_percent)?,
    })
}

/// Simulate every scenario and build the comparison report.
pub fn compare_scenarios(scenarios: &[NamedScenario]) -> Result<ComparisonReport> {
    validate_names(scenarios)?;
    info!("Comparing {} scenarios", scenarios.len());

    let mut outcomes = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let run = simulate_scenario(&scenario.config).map_err(|source| EngineError::ScenarioFailed {
            name: scenario.name.clone(),
            source: Box::new(source),
        })?;
        outcomes.push(ScenarioOutcome {
            name: scenario.name.clone(),
            timeline: run.timeline,
            summary: run.summary,
            events: run.events,
        });
    }

    let summary = summarize_comparison(&outcomes)?;
    info!(
        "Comparison complete: final supply from {} to {}",
        summary.supply_range.min, summary.supply_range.max
    );

    Ok(ComparisonReport {
        scenarios: outcomes,
        summary,
    })
}
