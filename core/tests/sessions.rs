//! Session expansion tests: coverage of active days, lifetime
//! confinement, and attribute distributions.

use growthsim_core::{
    cohort,
    config::SimConfig,
    engine::GrowthEngine,
    growth_curve, lifecycle,
    rng::RngBank,
    session,
};
use std::collections::{HashMap, HashSet};

#[test]
fn every_active_user_day_gets_at_least_one_session_and_no_inactive_day_any() {
    let config = SimConfig::default_test();
    let bank = RngBank::new(config.seed);
    let traj = growth_curve::generate(&config, &bank).unwrap();
    let cohorts = cohort::allocate(&traj);
    let users = lifecycle::sample(&config, &cohorts, &traj, &bank).unwrap();
    let sessions = session::expand(&config, &users, &traj, &bank);

    let session_days: HashSet<(&str, chrono::NaiveDate)> = sessions
        .iter()
        .map(|s| (s.user_id.as_str(), s.session_date))
        .collect();

    let mut active_days = 0usize;
    for user in &users {
        for (day, active) in user.activity.iter().enumerate() {
            let key = (user.user_id.as_str(), traj.dates[day]);
            if *active {
                active_days += 1;
                assert!(
                    session_days.contains(&key),
                    "active day {} for user {} has no session",
                    traj.dates[day],
                    user.user_id
                );
            } else {
                assert!(
                    !session_days.contains(&key),
                    "inactive day {} for user {} has sessions",
                    traj.dates[day],
                    user.user_id
                );
            }
        }
    }

    assert!(active_days > 0, "run produced no active user-days");
    assert_eq!(session_days.len(), active_days);
}

#[test]
fn zero_sessions_before_any_signup_date() {
    let config = SimConfig::default_test();
    let engine = GrowthEngine::new(config).unwrap();
    let output = engine.run().unwrap();

    let signup_by_id: HashMap<&str, chrono::NaiveDate> = output
        .users
        .rows
        .iter()
        .map(|u| (u.user_id.as_str(), u.signup_date))
        .collect();

    let offenders = output
        .sessions
        .rows
        .iter()
        .filter(|s| s.session_date < signup_by_id[s.user_id.as_str()])
        .count();
    assert_eq!(offenders, 0, "{offenders} sessions dated before signup");
}

#[test]
fn durations_and_event_counts_respect_configured_distributions() {
    let config = SimConfig::default_test();
    let xmin = config.session.duration_xmin_secs;
    let cap = config.session.duration_cap_secs;
    let engine = GrowthEngine::new(config).unwrap();
    let output = engine.run().unwrap();

    assert!(output.sessions.rows.len() > 100, "need a meaningful sample");
    for s in &output.sessions.rows {
        assert!(
            (s.duration_secs as f64) >= xmin.floor() && (s.duration_secs as f64) <= cap,
            "duration {} outside [{xmin}, {cap}]",
            s.duration_secs
        );
        assert!(s.event_count >= 1, "event_count must be at least 1");
    }

    // Pareto check: mean duration well above the median.
    let mut durations: Vec<u32> = output.sessions.rows.iter().map(|s| s.duration_secs).collect();
    durations.sort_unstable();
    let median = durations[durations.len() / 2] as f64;
    let mean = durations.iter().map(|&d| d as f64).sum::<f64>() / durations.len() as f64;
    assert!(
        mean > median * 1.2,
        "mean ({mean:.0}s) should sit well above median ({median:.0}s) for a Pareto shape"
    );
}
