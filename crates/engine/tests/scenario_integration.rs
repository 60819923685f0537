use std::str::FromStr;
use tokensim_engine::prelude::*;

fn d(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn combined_scenario() -> ScenarioConfig {
    ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Monthly, 24)
        .with_inflation(InflationConfig::Dynamic {
            initial_rate: Decimal::from(8),
            min_rate: Decimal::from(2),
            decay_rate: Decimal::from(5),
        })
        .with_burn(BurnConfig::Continuous {
            rate: d("1.5"),
        })
        .with_vesting(VestingConfig {
            periods: vec![
                VestingPeriod {
                    start_period: 0,
                    duration: 12,
                    amount: Decimal::from(200_000),
                    cliff_duration: 3,
                    release_type: ReleaseType::Linear,
                },
                VestingPeriod {
                    start_period: 6,
                    duration: 7,
                    amount: Decimal::from(70_001),
                    cliff_duration: 0,
                    release_type: ReleaseType::Linear,
                },
            ],
        })
        .with_staking(StakingConfig {
            enabled: true,
            target_rate: Decimal::from(40),
            reward_rate: Decimal::from(6),
            lock_duration: 4,
            rebalance: RebalancePolicy::FullJump,
        })
}

#[test]
fn test_constant_inflation_first_month() {
    let config = ScenarioConfig::new(Decimal::from(1_000), TimeStep::Monthly, 1).with_inflation(
        InflationConfig::Constant {
            initial_rate: Decimal::from(10),
        },
    );
    let run = simulate_scenario(&config).unwrap();

    assert_eq!(run.timeline.len(), 2);
    assert_eq!(run.summary.final_supply.round_dp(2), d("1008.33"));
    assert_eq!(run.summary.supply_change_percentage, d("0.83"));
}

#[test]
fn test_simulation_is_reproducible() {
    let config = combined_scenario();
    let first = simulate_scenario(&config).unwrap();
    let second = simulate_scenario(&config).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_balances_hold_every_period() {
    let run = simulate_scenario(&combined_scenario()).unwrap();
    assert_eq!(run.timeline.len(), 25);

    for (index, m) in run.timeline.iter().enumerate() {
        assert_eq!(m.period as usize, index);
        assert_eq!(
            m.circulating_supply + m.locked_amount,
            m.total_supply,
            "balance broken at period {}",
            m.period
        );
        for value in [
            m.total_supply,
            m.circulating_supply,
            m.minted_amount,
            m.burned_amount,
            m.vested_amount,
            m.staked_amount,
            m.staking_rewards,
            m.locked_amount,
        ] {
            assert!(value >= Decimal::ZERO, "negative quantity at period {}", m.period);
        }
        assert!(m.staked_amount <= m.total_supply);
    }
}

#[test]
fn test_summary_matches_timeline() {
    let run = simulate_scenario(&combined_scenario()).unwrap();
    let minted: Decimal = run.timeline.iter().map(|m| m.minted_amount).sum();
    let burned: Decimal = run.timeline.iter().map(|m| m.burned_amount).sum();
    let vested: Decimal = run.timeline.iter().map(|m| m.vested_amount).sum();
    let rewards: Decimal = run.timeline.iter().map(|m| m.staking_rewards).sum();

    assert_eq!(run.summary.total_minted, minted);
    assert_eq!(run.summary.total_burned, burned);
    assert_eq!(run.summary.total_vested, vested);
    assert_eq!(run.summary.total_staking_rewards, rewards);
    assert_eq!(
        run.summary.final_supply,
        run.summary.initial_supply + minted - burned
    );
    // Both tranches have fully vested by period 24.
    assert_eq!(vested, Decimal::from(270_001));
}

#[test]
fn test_burn_event_applies_only_at_its_period() {
    let config = ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Monthly, 12).with_burn(
        BurnConfig::EventBased {
            events: vec![BurnEvent {
                period: 6,
                amount: Decimal::from(100_000),
            }],
        },
    );
    let run = simulate_scenario(&config).unwrap();

    for m in &run.timeline {
        if m.period == 6 {
            assert_eq!(m.burned_amount, Decimal::from(100_000));
        } else {
            assert!(m.burned_amount.is_zero());
        }
    }
    assert_eq!(run.timeline.get(5).unwrap().total_supply, Decimal::from(1_000_000));
    assert_eq!(run.timeline.get(6).unwrap().total_supply, Decimal::from(900_000));
    assert_eq!(run.summary.final_supply, Decimal::from(900_000));
    assert_eq!(run.summary.supply_change_percentage, Decimal::from(-10));
}

#[test]
fn test_vesting_cliff_then_linear_release() {
    let config = ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Monthly, 12).with_vesting(
        VestingConfig {
            periods: vec![VestingPeriod {
                start_period: 0,
                duration: 12,
                amount: Decimal::from(200_000),
                cliff_duration: 3,
                release_type: ReleaseType::Linear,
            }],
        },
    );
    let run = simulate_scenario(&config).unwrap();

    let genesis = run.timeline.first().unwrap();
    assert_eq!(genesis.locked_amount, Decimal::from(200_000));
    assert_eq!(genesis.circulating_supply, Decimal::from(800_000));

    assert!(run.timeline.get(1).unwrap().vested_amount.is_zero());
    assert!(run.timeline.get(2).unwrap().vested_amount.is_zero());
    assert_eq!(run.timeline.get(3).unwrap().vested_amount, Decimal::from(50_000));
    assert_eq!(run.timeline.get(4).unwrap().vested_amount, d("16666.666667"));

    let last = run.timeline.last().unwrap();
    assert_eq!(last.cumulative_vested, Decimal::from(200_000));
    assert!(last.locked_amount.is_zero());
    assert_eq!(last.circulating_supply, Decimal::from(1_000_000));
}

#[test]
fn test_staking_lock_blocks_unstaking() {
    let config = ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Monthly, 8)
        .with_burn(BurnConfig::EventBased {
            events: vec![BurnEvent {
                period: 2,
                amount: Decimal::from(200_000),
            }],
        })
        .with_staking(StakingConfig {
            enabled: true,
            target_rate: Decimal::from(50),
            reward_rate: Decimal::ZERO,
            lock_duration: 6,
            rebalance: RebalancePolicy::FullJump,
        });
    let run = simulate_scenario(&config).unwrap();

    assert_eq!(run.timeline.first().unwrap().staked_amount, Decimal::from(500_000));
    // Target drops to 400_000 after the burn, but the stake stays locked.
    for period in 2..=6 {
        assert_eq!(
            run.timeline.get(period).unwrap().staked_amount,
            Decimal::from(500_000),
            "unstaked during lock at period {period}"
        );
    }
    assert_eq!(run.timeline.get(7).unwrap().staked_amount, Decimal::from(400_000));
    assert_eq!(run.summary.current_staked, Decimal::from(400_000));
}

#[test]
fn test_gradual_rebalance_closes_part_of_gap() {
    let config = ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Monthly, 2)
        .with_burn(BurnConfig::EventBased {
            events: vec![BurnEvent {
                period: 1,
                amount: Decimal::from(500_000),
            }],
        })
        .with_staking(StakingConfig {
            enabled: true,
            target_rate: Decimal::from(20),
            reward_rate: Decimal::ZERO,
            lock_duration: 0,
            rebalance: RebalancePolicy::Gradual {
                step_percent: Decimal::from(50),
            },
        });
    let run = simulate_scenario(&config).unwrap();

    // Staked 200_000, target 100_000 after the burn: half the gap per period.
    assert_eq!(run.timeline.get(1).unwrap().staked_amount, Decimal::from(150_000));
    assert_eq!(run.timeline.get(2).unwrap().staked_amount, Decimal::from(125_000));
}

#[test]
fn test_yearly_time_step_uses_full_rate() {
    let config = ScenarioConfig::new(Decimal::from(1_000), TimeStep::Yearly, 3).with_inflation(
        InflationConfig::Constant {
            initial_rate: Decimal::from(10),
        },
    );
    let run = simulate_scenario(&config).unwrap();

    assert_eq!(run.timeline.len(), 4);
    assert_eq!(run.summary.final_supply, Decimal::from(1_331));
    assert_eq!(run.summary.supply_change_percentage, d("33.10"));
}

#[test]
fn test_halving_leaves_config_untouched() {
    let inflation = InflationConfig::Halving {
        initial_rate: Decimal::from(8),
        halving_period: 2,
    };
    let config = ScenarioConfig::new(Decimal::from(1_000_000), TimeStep::Yearly, 4)
        .with_inflation(inflation.clone());
    let run = simulate_scenario(&config).unwrap();

    let minted: Vec<_> = run.timeline.iter().map(|m| m.minted_amount).collect();
    assert_eq!(
        minted,
        vec![
            Decimal::ZERO,
            Decimal::from(80_000),
            Decimal::from(43_200),
            Decimal::from(44_928),
            d("23362.56"),
        ]
    );
    assert_eq!(config.inflation, Some(inflation));
}

#[test]
fn test_rejects_scenario_without_mechanism() {
    let config = ScenarioConfig::new(Decimal::from(1_000), TimeStep::Monthly, 12);
    assert!(matches!(
        simulate_scenario(&config),
        Err(EngineError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_scenario_from_json() {
    let json = r#"{
        "initial_supply": "1000000",
        "time_step": "monthly",
        "duration": 12,
        "inflation_config": { "type": "constant", "initial_rate": 5 },
        "burn_config": { "events": [{ "month": 6, "amount": 1000 }] },
        "staking_config": { "target_rate": 30, "reward_rate": 8, "lock_duration": 3 }
    }"#;
    let config: ScenarioConfig = serde_json::from_str(json).unwrap();

    assert!(matches!(config.burn, Some(BurnConfig::EventBased { .. })));
    let staking = config.staking.as_ref().unwrap();
    assert!(staking.enabled);
    assert_eq!(staking.rebalance, RebalancePolicy::FullJump);
    simulate_scenario(&config).unwrap();
}

#[test]
fn test_burn_with_rate_and_events_is_rejected() {
    let json = r#"{ "rate": 2, "events": [{ "period": 1, "amount": 10 }] }"#;
    assert!(serde_json::from_str::<BurnConfig>(json).is_err());

    let json = r#"{}"#;
    assert!(serde_json::from_str::<BurnConfig>(json).is_err());
}

#[test]
fn test_shock_events_from_json() {
    let json = r#"{
        "initial_supply": "1000000",
        "duration": 12,
        "shock_events": [
            { "time_step": 3, "event_type": "mass_burn", "value": 0.3 },
            { "period": 6, "event_type": "inflation_spike", "fraction": "0.1", "description": "emergency mint" }
        ]
    }"#;
    let config: ScenarioConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.shocks.len(), 2);
    assert_eq!(config.shocks[0].event_type, ShockKind::MassBurn);
    assert_eq!(config.shocks[0].fraction, d("0.3"));

    let run = simulate_scenario(&config).unwrap();
    assert_eq!(run.events.len(), 2);
    assert_eq!(run.events[0].period, 3);
    assert_eq!(run.events[0].amount, Decimal::from(300_000));
    assert_eq!(run.events[1].message, "emergency mint");
    assert_eq!(run.events[1].amount, Decimal::from(70_000));
    assert_eq!(run.summary.final_supply, Decimal::from(770_000));

    let value = serde_json::to_value(&run).unwrap();
    assert_eq!(value["events"][0]["event_type"], "mass_burn");
}

#[test]
fn test_shocks_keep_balances_and_totals() {
    let config = combined_scenario().with_shocks(vec![
        ShockEvent::new(2, ShockKind::Unlock, d("0.25")),
        ShockEvent::new(8, ShockKind::Buyback, d("0.1")),
        ShockEvent::new(8, ShockKind::InflationSpike, d("0.05")),
        ShockEvent::new(30, ShockKind::MassBurn, d("0.9")),
    ]);
    let run = simulate_scenario(&config).unwrap();

    for m in &run.timeline {
        assert_eq!(m.circulating_supply + m.locked_amount, m.total_supply);
        assert!(m.circulating_supply >= Decimal::ZERO);
    }

    let minted: Decimal = run.timeline.iter().map(|m| m.minted_amount).sum();
    let burned: Decimal = run.timeline.iter().map(|m| m.burned_amount).sum();
    let vested: Decimal = run.timeline.iter().map(|m| m.vested_amount).sum();
    assert_eq!(run.summary.total_minted, minted);
    assert_eq!(run.summary.total_burned, burned);
    assert_eq!(run.summary.final_supply, run.summary.initial_supply + minted - burned);
    assert_eq!(vested, Decimal::from(270_001));

    // Past the last period, the mass burn never fires.
    let periods: Vec<_> = run.events.iter().map(|e| e.period).collect();
    assert_eq!(periods, vec![2, 8, 8]);

    let without = simulate_scenario(&combined_scenario()).unwrap();
    assert!(run.timeline.get(2).unwrap().vested_amount > without.timeline.get(2).unwrap().vested_amount);
}

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ScenarioConfig>();
    assert_send_sync::<ScenarioRun>();
    assert_send_sync::<ComparisonReport>();
    assert_send_sync::<EngineError>();
}
