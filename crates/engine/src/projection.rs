//! Constant-inflation supply projection, compounded once per year.

use crate::decimal::{checked_add, checked_sub, percent_of, quantize, quantize_percent, safe_divide};
use crate::errors::{EngineError, Result};
use crate::types::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest projection accepted, in years.
pub const MAX_PROJECTION_YEARS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub year: u32,
    pub supply: Amount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyIncrease {
    pub absolute: Amount,
    pub percentage: Decimal,
}

/// Supply at the start of every year `0..=years` under a fixed annual rate.
pub fn project_constant_inflation(
    initial_supply: Amount,
    annual_rate: Decimal,
    years: u32,
) -> Result<Vec<SupplyPoint>> {
    if initial_supply <= Decimal::ZERO {
        return Err(EngineError::invalid("initial_supply must be positive"));
    }
    if annual_rate < Decimal::ZERO || annual_rate > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid(format!(
            "inflation rate must be between 0 and 100, got {annual_rate}"
        )));
    }
    if years == 0 || years > MAX_PROJECTION_YEARS {
        return Err(EngineError::invalid(format!(
            "years must be between 1 and {MAX_PROJECTION_YEARS}, got {years}"
        )));
    }

    let mut supply = quantize(initial_supply);
    let mut points = Vec::with_capacity(years as usize + 1);
    points.push(SupplyPoint { year: 0, supply });

    for year in 1..=years {
        let minted = quantize(percent_of(supply, annual_rate)?);
        supply = checked_add(supply, minted, "projected supply")?;
        debug!("Projected year {}: supply={}", year, supply);
        points.push(SupplyPoint { year, supply });
    }

    Ok(points)
}

/// Growth from the first to the last point. Zero for fewer than two points.
pub fn supply_increase(points: &[SupplyPoint]) -> Result<SupplyIncrease> {
    let (first, last) = match points {
        [first, .., last] => (first, last),
        _ => {
            return Ok(SupplyIncrease {
                absolute: Decimal::ZERO,
                percentage: Decimal::ZERO,
            })
        }
    };

    let absolute = checked_sub(last.supply, first.supply, "supply increase")?;
    let ratio = safe_divide(absolute, first.supply);
    Ok(SupplyIncrease {
        absolute,
        percentage: quantize_percent(ratio * Decimal::ONE_HUNDRED),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compounds_yearly() {
        let points = project_constant_inflation(Decimal::from(1_000), Decimal::from(10), 2).unwrap();
        let supplies: Vec<_> = points.iter().map(|p| p.supply).collect();
        assert_eq!(
            supplies,
            vec![Decimal::from(1_000), Decimal::from(1_100), Decimal::from(1_210)]
        );
        assert_eq!(points[2].year, 2);
    }

    #[test]
    fn increase_between_endpoints() {
        let points = project_constant_inflation(Decimal::from(1_000), Decimal::from(10), 2).unwrap();
        let increase = supply_increase(&points).unwrap();
        assert_eq!(increase.absolute, Decimal::from(210));
        assert_eq!(increase.percentage, Decimal::from(21));
    }

    #[test]
    fn single_point_has_no_increase() {
        let point = SupplyPoint {
            year: 0,
            supply: Decimal::from(5),
        };
        let increase = supply_increase(&[point]).unwrap();
        assert!(increase.absolute.is_zero());
        assert!(increase.percentage.is_zero());
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert!(project_constant_inflation(Decimal::ZERO, Decimal::from(5), 3).is_err());
        assert!(project_constant_inflation(Decimal::from(10), Decimal::from(101), 3).is_err());
        assert!(project_constant_inflation(Decimal::from(10), Decimal::from(5), 0).is_err());
        assert!(
            project_constant_inflation(Decimal::from(10), Decimal::from(5), MAX_PROJECTION_YEARS + 1)
                .is_err()
        );
    }
}
