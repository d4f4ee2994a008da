//! Dataset assembler tests: the final validation gate must catch
//! invariant drift that upstream components would otherwise let through.

use chrono::{Duration, NaiveDate};
use growthsim_core::{
    dataset,
    error::SimError,
    growth_curve::GrowthTrajectory,
    lifecycle::User,
    session::Session,
};

fn tiny_trajectory(days: usize) -> GrowthTrajectory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    GrowthTrajectory {
        dates: (0..days).map(|d| start + Duration::days(d as i64)).collect(),
        total_users: vec![2; days],
        dau_fraction: vec![0.5; days],
    }
}

fn user(id: &str, signup_day: usize, active_days: &[usize], days: usize) -> User {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut activity = vec![false; days];
    for &d in active_days {
        activity[d] = true;
    }
    User {
        user_id: id.into(),
        signup_date: start + Duration::days(signup_day as i64),
        churn_date: None,
        stickiness: 0.5,
        age: 30,
        country: "US".into(),
        activity,
    }
}

fn session_on(id: &str, user_id: &str, day: usize) -> Session {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    Session {
        session_id: id.into(),
        user_id: user_id.into(),
        session_date: start + Duration::days(day as i64),
        duration_secs: 120,
        event_count: 3,
    }
}

#[test]
fn valid_input_assembles_sorted_tables() {
    let traj = tiny_trajectory(5);
    let users = vec![user("u-b", 1, &[1, 3], 5), user("u-a", 0, &[0, 2], 5)];
    let sessions = vec![
        session_on("s-3", "u-b", 3),
        session_on("s-1", "u-a", 0),
        session_on("s-2", "u-a", 2),
        session_on("s-0", "u-b", 1),
    ];

    let (user_table, session_table) = dataset::assemble(&users, sessions, &traj).unwrap();

    let user_order: Vec<&str> = user_table.rows.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(user_order, vec!["u-a", "u-b"], "users sorted by signup date");

    let dates: Vec<NaiveDate> = session_table.rows.iter().map(|r| r.session_date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted, "sessions sorted chronologically");
}

#[test]
fn rejects_sessions_referencing_unknown_users() {
    let traj = tiny_trajectory(5);
    let users = vec![user("u-a", 0, &[0], 5)];
    let sessions = vec![session_on("s-x", "u-ghost", 0)];

    let err = dataset::assemble(&users, sessions, &traj).unwrap_err();
    assert!(
        matches!(err, SimError::Validation(_)),
        "expected Validation, got: {err}"
    );
}

#[test]
fn rejects_sessions_on_inactive_days() {
    let traj = tiny_trajectory(5);
    let users = vec![user("u-a", 0, &[0, 2], 5)];
    let sessions = vec![session_on("s-x", "u-a", 1)]; // day 1 is inactive

    let err = dataset::assemble(&users, sessions, &traj).unwrap_err();
    assert!(matches!(err, SimError::Validation(_)));
}

#[test]
fn rejects_activity_before_signup() {
    let traj = tiny_trajectory(5);
    let users = vec![user("u-a", 2, &[0], 5)]; // active before signup

    let err = dataset::assemble(&users, vec![], &traj).unwrap_err();
    assert!(matches!(err, SimError::Validation(_)));
}

#[test]
fn rejects_activity_after_churn() {
    let traj = tiny_trajectory(5);
    let mut bad = user("u-a", 0, &[0, 4], 5);
    bad.churn_date = Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()); // churned day 0

    let err = dataset::assemble(&[bad], vec![], &traj).unwrap_err();
    assert!(matches!(err, SimError::Validation(_)));
}
