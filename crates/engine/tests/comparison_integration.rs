use tokensim_engine::prelude::*;

fn constant(name: &str, rate: i64) -> NamedScenario {
    NamedScenario::new(
        name,
        ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Yearly, 1).with_inflation(
            InflationConfig::Constant {
                initial_rate: Decimal::from(rate),
            },
        ),
    )
}

#[test]
fn test_comparison_ranges() {
    let report = compare_scenarios(&[constant("flat", 0), constant("growth", 20)]).unwrap();

    let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["flat", "growth"]);

    let summary = &report.summary;
    assert_eq!(
        summary.supply_range.as_tuple(),
        (Decimal::from(1_000_000), Decimal::from(1_200_000))
    );
    assert_eq!(summary.supply_range.avg, Decimal::from(1_100_000));
    assert_eq!(
        summary.minted_range.as_tuple(),
        (Decimal::ZERO, Decimal::from(200_000))
    );
    assert_eq!(summary.burned_range.as_tuple(), (Decimal::ZERO, Decimal::ZERO));
    assert_eq!(summary.staked_range.as_tuple(), (Decimal::ZERO, Decimal::ZERO));
    assert_eq!(
        summary.supply_change_range.as_tuple(),
        (Decimal::ZERO, Decimal::from(20))
    );
}

#[test]
fn test_comparison_matches_individual_runs() {
    let scenarios = vec![constant("a", 5), constant("b", 10), constant("c", 15)];
    let report = compare_scenarios(&scenarios).unwrap();

    for (scenario, outcome) in scenarios.iter().zip(&report.scenarios) {
        let run = simulate_scenario(&scenario.config).unwrap();
        assert_eq!(outcome.timeline, run.timeline);
        assert_eq!(outcome.summary, run.summary);
    }
}

#[test]
fn test_comparison_scenario_count_bounds() {
    assert!(matches!(
        compare_scenarios(&[constant("only", 5)]),
        Err(EngineError::InvalidComparison(_))
    ));
    assert!(matches!(
        compare_scenarios(&[]),
        Err(EngineError::InvalidComparison(_))
    ));

    let five: Vec<_> = (1..=5).map(|i| constant(&format!("s{i}"), i)).collect();
    assert_eq!(compare_scenarios(&five).unwrap().scenarios.len(), 5);
}

#[test]
fn test_comparison_aborts_on_failing_scenario() {
    let broken = NamedScenario::new(
        "broken",
        ScenarioConfig::new(Decimal::from(1_000), TimeStep::Monthly, 12),
    );
    let err = compare_scenarios(&[constant("ok", 5), broken]).unwrap_err();

    match err {
        EngineError::ScenarioFailed { name, source } => {
            assert_eq!(name, "broken");
            assert!(matches!(*source, EngineError::InvalidConfiguration(_)));
        }
        other => panic!("expected ScenarioFailed, got {other:?}"),
    }
}

#[test]
fn test_comparison_rejects_duplicate_names() {
    assert!(matches!(
        compare_scenarios(&[constant("same", 5), constant("same", 10)]),
        Err(EngineError::InvalidComparison(_))
    ));
}

#[test]
fn test_comparison_from_json() {
    let json = r#"[
        { "name": "baseline", "initial_supply": 1000000, "duration": 12,
          "inflation": { "type": "constant", "initial_rate": 2 } },
        { "name": "deflationary", "initial_supply": 1000000, "duration": 12,
          "burn": { "rate": 3 } }
    ]"#;
    let scenarios: Vec<NamedScenario> = serde_json::from_str(json).unwrap();
    let report = compare_scenarios(&scenarios).unwrap();

    let supply = report.summary.supply_range;
    assert!(supply.min < Decimal::from(1_000_000));
    assert!(supply.max > Decimal::from(1_000_000));
}
