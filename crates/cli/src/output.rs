//! Rendering of engine results as JSON, CSV or a plain-text table.

use crate::settings::OutputFormat;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::{self, Write as _};
use tokensim_engine::{
    ComparisonReport, ScenarioRun, ScenarioSummary, ShockRecord, SupplyIncrease, SupplyPoint,
    Timeline,
};

#[derive(Serialize)]
struct ProjectionReport<'a> {
    points: &'a [SupplyPoint],
    increase: &'a SupplyIncrease,
}

/// One CSV row per scenario in a comparison. The csv writer cannot flatten
/// nested structs, so the summary fields are spelled out.
#[derive(Serialize)]
struct SummaryRow<'a> {
    name: &'a str,
    initial_supply: Decimal,
    final_supply: Decimal,
    total_minted: Decimal,
    total_burned: Decimal,
    total_vested: Decimal,
    total_staking_rewards: Decimal,
    current_staked: Decimal,
    current_locked: Decimal,
    supply_change_percentage: Decimal,
}

impl<'a> SummaryRow<'a> {
    fn new(name: &'a str, summary: &ScenarioSummary) -> Self {
        Self {
            name,
            initial_supply: summary.initial_supply,
            final_supply: summary.final_supply,
            total_minted: summary.total_minted,
            total_burned: summary.total_burned,
            total_vested: summary.total_vested,
            total_staking_rewards: summary.total_staking_rewards,
            current_staked: summary.current_staked,
            current_locked: summary.current_locked,
            supply_change_percentage: summary.supply_change_percentage,
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialize output as JSON")
}

fn to_csv<T, I>(rows: I) -> Result<String>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush CSV output: {}", err.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn timeline_table(timeline: &Timeline) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:>6} {:>22} {:>22} {:>18} {:>18} {:>18} {:>22} {:>22}",
        "period", "total", "circulating", "minted", "burned", "vested", "staked", "locked"
    )?;
    for m in timeline {
        writeln!(
            out,
            "{:>6} {:>22} {:>22} {:>18} {:>18} {:>18} {:>22} {:>22}",
            m.period,
            m.total_supply.round_dp(2),
            m.circulating_supply.round_dp(2),
            m.minted_amount.round_dp(2),
            m.burned_amount.round_dp(2),
            m.vested_amount.round_dp(2),
            m.staked_amount.round_dp(2),
            m.locked_amount.round_dp(2),
        )?;
    }
    Ok(out)
}

fn summary_lines(out: &mut String, summary: &ScenarioSummary) -> fmt::Result {
    writeln!(out, "  initial supply:        {}", summary.initial_supply.round_dp(2))?;
    writeln!(out, "  final supply:          {}", summary.final_supply.round_dp(2))?;
    writeln!(out, "  total minted:          {}", summary.total_minted.round_dp(2))?;
    writeln!(out, "  total burned:          {}", summary.total_burned.round_dp(2))?;
    writeln!(out, "  total vested:          {}", summary.total_vested.round_dp(2))?;
    writeln!(out, "  staking rewards:       {}", summary.total_staking_rewards.round_dp(2))?;
    writeln!(out, "  currently staked:      {}", summary.current_staked.round_dp(2))?;
    writeln!(out, "  currently locked:      {}", summary.current_locked.round_dp(2))?;
    writeln!(out, "  supply change:         {}%", summary.supply_change_percentage)
}

fn shock_lines(out: &mut String, events: &[ShockRecord]) -> fmt::Result {
    for event in events {
        writeln!(
            out,
            "  period {:>4}  {:<16} {:>18}  {}",
            event.period,
            event.event_type.as_str(),
            event.amount.round_dp(2),
            event.message
        )?;
    }
    Ok(())
}

pub fn render_run(run: &ScenarioRun, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(run, pretty),
        OutputFormat::Csv => to_csv(&run.timeline),
        OutputFormat::Table => {
            let mut out = timeline_table(&run.timeline)?;
            out.push_str("\nSummary\n");
            summary_lines(&mut out, &run.summary)?;
            if !run.events.is_empty() {
                out.push_str("\nShocks\n");
                shock_lines(&mut out, &run.events)?;
            }
            Ok(out)
        }
    }
}

pub fn render_comparison(
    report: &ComparisonReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report, pretty),
        OutputFormat::Csv => to_csv(
            report
                .scenarios
                .iter()
                .map(|outcome| SummaryRow::new(&outcome.name, &outcome.summary)),
        ),
        OutputFormat::Table => {
            let mut out = String::new();
            for outcome in &report.scenarios {
                writeln!(out, "{}", outcome.name)?;
                summary_lines(&mut out, &outcome.summary)?;
            }

            let summary = &report.summary;
            out.push_str("\nRanges (min / max / avg)\n");
            for (label, range) in [
                ("final supply", &summary.supply_range),
                ("minted", &summary.minted_range),
                ("burned", &summary.burned_range),
                ("staked", &summary.staked_range),
                ("supply change %", &summary.supply_change_range),
            ] {
                writeln!(
                    out,
                    "  {:<16} {} / {} / {}",
                    label,
                    range.min.round_dp(2),
                    range.max.round_dp(2),
                    range.avg.round_dp(2)
                )?;
            }
            Ok(out)
        }
    }
}

pub fn render_projection(
    points: &[SupplyPoint],
    increase: &SupplyIncrease,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&ProjectionReport { points, increase }, pretty),
        OutputFormat::Csv => to_csv(points),
        OutputFormat::Table => {
            let mut out = String::new();
            writeln!(out, "{:>4} {:>24}", "year", "supply")?;
            for point in points {
                writeln!(out, "{:>4} {:>24}", point.year, point.supply.round_dp(2))?;
            }
            writeln!(
                out,
                "\nIncrease: {} ({}%)",
                increase.absolute.round_dp(2),
                increase.percentage
            )?;
            Ok(out)
        }
    }
}
