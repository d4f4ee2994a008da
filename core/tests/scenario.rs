//! The canonical demo scenario: one year, 10k starting users, +200%
//! YoY growth, slowly eroding engagement. Plus an end-to-end run on a
//! mid-sized population exercising the full pipeline.

use chrono::NaiveDate;
use growthsim_core::{
    config::SimConfig, engine::GrowthEngine, growth_curve, rng::RngBank,
};
use std::collections::HashMap;

fn demo_config() -> SimConfig {
    let mut config = SimConfig::default_test();
    config.start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    config.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    config.start_users = 10_000;
    config.approx_yoy_growth_rate = 2.0;
    config.dau_fraction_initial = 0.25;
    config.dau_drift = -0.0005;
    config.dau_volatility = 0.01;
    config.seed = 42;
    config
}

#[test]
fn demo_trajectory_lands_near_30k_users() {
    let config = demo_config();
    let traj = growth_curve::generate(&config, &RngBank::new(config.seed)).unwrap();

    assert_eq!(traj.len(), 366); // 2024 is a leap year, half-open range
    assert_eq!(traj.total_users[0], 10_000);

    let end = *traj.total_users.last().unwrap() as f64;
    assert!(
        (end / 10_000.0 - 3.0).abs() <= 0.15,
        "expected ~30k users at the end of the year, got {end}"
    );

    for &f in &traj.dau_fraction {
        assert!((config.dau_fraction_min..=config.dau_fraction_max).contains(&f));
    }
}

#[test]
fn full_pipeline_run_holds_all_cross_table_invariants() {
    // Smaller population, same shape; keeps the full run fast while
    // still exercising every stage.
    let mut config = demo_config();
    config.start_users = 1_500;

    let engine = GrowthEngine::new(config).unwrap();
    let output = engine.run().unwrap();

    assert_eq!(
        output.users.rows.len() as u64,
        *output.trajectory.total_users.last().unwrap()
    );

    // Cohort reconciliation against the trajectory.
    let mut cumulative = 0u64;
    for (day, cohort) in output.cohorts.iter().enumerate() {
        cumulative += cohort.signup_count;
        assert_eq!(cumulative, output.trajectory.total_users[day]);
    }

    // Referential integrity and signup ordering across the two tables.
    let signup_by_id: HashMap<&str, NaiveDate> = output
        .users
        .rows
        .iter()
        .map(|u| (u.user_id.as_str(), u.signup_date))
        .collect();
    for s in &output.sessions.rows {
        let signup = signup_by_id
            .get(s.user_id.as_str())
            .expect("session user exists in the user table");
        assert!(
            s.session_date >= *signup,
            "session {} predates its user's signup",
            s.session_id
        );
    }

    // Demographics stay inside the configured clamps.
    let demo = &engine.config().demographics;
    let countries: Vec<&str> = demo.countries.iter().map(|(c, _)| c.as_str()).collect();
    for u in &output.users.rows {
        assert!((demo.age_min..=demo.age_max).contains(&u.age));
        assert!(countries.contains(&u.country.as_str()));
    }

    // Churn flags are consistent with churn dates.
    for u in &output.users.rows {
        assert_eq!(u.is_churned, u.churn_date.is_some());
        if let Some(churn) = u.churn_date {
            assert!(churn >= u.signup_date);
        }
    }
}
