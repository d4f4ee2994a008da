//! Dataset assembly — the final validation gate.
//!
//! Upstream components each maintain their own invariants, but the
//! assembler re-checks everything before handing tables to the caller:
//! referential integrity, session dates inside lifetime windows and on
//! active days, activity flags confined to [signup, churn]. Any
//! violation here is an internal defect and fails the run outright.

use crate::{
    error::{SimError, SimResult},
    growth_curve::GrowthTrajectory,
    lifecycle::User,
    session::Session,
    types::UserId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row per user, sorted by (signup_date, user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: UserId,
    pub signup_date: NaiveDate,
    pub churn_date: Option<NaiveDate>,
    pub is_churned: bool,
    pub age: u32,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTable {
    pub rows: Vec<UserRow>,
}

/// One row per session, sorted by (session_date, user_id, session_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTable {
    pub rows: Vec<Session>,
}

pub fn assemble(
    users: &[User],
    sessions: Vec<Session>,
    trajectory: &GrowthTrajectory,
) -> SimResult<(UserTable, SessionTable)> {
    let by_id: HashMap<&str, &User> = users.iter().map(|u| (u.user_id.as_str(), u)).collect();
    if by_id.len() != users.len() {
        return Err(SimError::Validation("duplicate user_id".into()));
    }

    // Per-user invariant: activity confined to [signup, churn or end].
    for user in users {
        let signup_day = trajectory.day_index(user.signup_date).ok_or_else(|| {
            SimError::Validation(format!(
                "user {} signup {} outside run range",
                user.user_id, user.signup_date
            ))
        })?;
        let last_day = match user.churn_date {
            Some(churn) => trajectory.day_index(churn).ok_or_else(|| {
                SimError::Validation(format!(
                    "user {} churn {churn} outside run range",
                    user.user_id
                ))
            })?,
            None => trajectory.len() - 1,
        };
        if last_day < signup_day && user.churn_date.is_some() {
            return Err(SimError::Validation(format!(
                "user {} churned before signup",
                user.user_id
            )));
        }
        for (day, active) in user.activity.iter().enumerate() {
            if *active && (day < signup_day || day > last_day) {
                return Err(SimError::Validation(format!(
                    "user {} active on day {day} outside [{signup_day}, {last_day}]",
                    user.user_id
                )));
            }
        }
    }

    // Per-session invariants: known user, date on an active day.
    for session in &sessions {
        let user = by_id.get(session.user_id.as_str()).ok_or_else(|| {
            SimError::Validation(format!(
                "session {} references unknown user {}",
                session.session_id, session.user_id
            ))
        })?;
        let day = trajectory.day_index(session.session_date).ok_or_else(|| {
            SimError::Validation(format!(
                "session {} dated {} outside run range",
                session.session_id, session.session_date
            ))
        })?;
        if !user.activity[day] {
            return Err(SimError::Validation(format!(
                "session {} on {} but user {} is inactive that day",
                session.session_id, session.session_date, session.user_id
            )));
        }
    }

    let mut user_rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            user_id: u.user_id.clone(),
            signup_date: u.signup_date,
            churn_date: u.churn_date,
            is_churned: u.is_churned(),
            age: u.age,
            country: u.country.clone(),
        })
        .collect();
    user_rows.sort_by(|a, b| {
        a.signup_date
            .cmp(&b.signup_date)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let mut session_rows = sessions;
    session_rows.sort_by(|a, b| {
        a.session_date
            .cmp(&b.session_date)
            .then_with(|| a.user_id.cmp(&b.user_id))
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    log::info!(
        "dataset: {} user rows, {} session rows",
        user_rows.len(),
        session_rows.len()
    );

    Ok((
        UserTable { rows: user_rows },
        SessionTable { rows: session_rows },
    ))
}
