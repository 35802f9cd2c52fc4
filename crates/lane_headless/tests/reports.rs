//! Headless reports are reproducible and consistent with the core.

use lane_core::config::MatchConfig;
use lane_headless::runner::{build_simulation, run_match, RunConfig};
use lane_test_utils::determinism::verify_determinism;
use lane_test_utils::fixtures::{coarse_config, fixed, fixed_f};

fn config(seed: u64) -> RunConfig {
    RunConfig {
        match_config: coarse_config(),
        seed,
        max_minutes: 3,
        dt: fixed_f(0.25),
    }
}

#[test]
fn report_hash_matches_direct_simulation() {
    let run = config(21);
    let report = run_match(&run);

    let mut sim = build_simulation(&run);
    for _ in 0..report.ticks {
        sim.advance(run.dt);
    }
    assert_eq!(sim.state_hash(), report.state_hash);
    assert_eq!(sim.state().winner, report.winner);
}

#[test]
fn repeated_runs_agree() {
    verify_determinism(3, 1, || config(77), |_| {}, |run| run_match(run).state_hash).assert_deterministic();
}

#[test]
fn different_seeds_play_differently() {
    let a = run_match(&config(1));
    let b = run_match(&config(2));
    assert_ne!(a.state_hash, b.state_hash);
}

#[test]
fn reference_balance_loads_from_ron() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balance.ron");
    std::fs::write(&path, "(starting_gold: 250.0, wave_interval: 6.0)").unwrap();

    let run = RunConfig::from_args(Some(&path), 5, 1, 0.25).unwrap();
    assert_eq!(run.match_config.starting_gold, fixed(250));
    assert_eq!(run.match_config.wave_interval, fixed(6));
    assert_eq!(run.match_config.gold_per_second, MatchConfig::default().gold_per_second);
}
