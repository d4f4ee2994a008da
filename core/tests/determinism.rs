//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two runs, same config, same seed. They must produce byte-identical
//! user and session tables — ids included. Any divergence is a blocker.

use growthsim_core::{config::SimConfig, engine::GrowthEngine};

fn run_tables(seed: u64) -> (String, String) {
    let mut config = SimConfig::default_test();
    config.seed = seed;
    let engine = GrowthEngine::new(config).expect("valid config");
    let output = engine.run().expect("run");
    (
        serde_json::to_string(&output.users).expect("serialize users"),
        serde_json::to_string(&output.sessions).expect("serialize sessions"),
    )
}

#[test]
fn same_seed_produces_identical_tables() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let (users_a, sessions_a) = run_tables(SEED);
    let (users_b, sessions_b) = run_tables(SEED);

    assert_eq!(users_a, users_b, "user tables diverged for the same seed");
    assert_eq!(
        sessions_a, sessions_b,
        "session tables diverged for the same seed"
    );
}

#[test]
fn different_seeds_produce_different_tables() {
    let (users_a, _) = run_tables(42);
    let (users_b, _) = run_tables(99);

    assert_ne!(
        users_a, users_b,
        "different seeds produced identical user tables — seed is not being used"
    );
}
