//! Session expansion — one or more session records per active user-day.
//!
//! Session counts are 1 + Poisson(burst_lambda) to mimic bursty
//! engagement; durations follow a capped Pareto; event counts are
//! 1 + Poisson(events_lambda). Sessions are only ever emitted for days
//! the user's activity calendar marks active, which keeps every session
//! inside the user's lifetime window by construction.

use crate::{
    config::SimConfig,
    growth_curve::GrowthTrajectory,
    lifecycle::User,
    rng::{RngBank, StreamSlot},
    types::{SessionId, UserId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub session_date: NaiveDate,
    pub duration_secs: u32,
    pub event_count: u32,
}

pub fn expand(
    config: &SimConfig,
    users: &[User],
    trajectory: &GrowthTrajectory,
    bank: &RngBank,
) -> Vec<Session> {
    let params = &config.session;
    let mut rng = bank.for_stream(StreamSlot::Session);
    let mut sessions = Vec::new();

    for user in users {
        for (day, active) in user.activity.iter().enumerate() {
            if !*active {
                continue;
            }
            let session_date = trajectory.dates[day];
            let count = 1 + rng.poisson(params.burst_lambda);
            for _ in 0..count {
                let session_id =
                    Uuid::from_u64_pair(rng.next_u64(), rng.next_u64()).to_string();
                let duration = rng
                    .pareto(params.duration_xmin_secs, params.duration_alpha)
                    .min(params.duration_cap_secs);
                let event_count = 1 + rng.poisson(params.events_lambda) as u32;
                sessions.push(Session {
                    session_id,
                    user_id: user.user_id.clone(),
                    session_date,
                    duration_secs: duration.round() as u32,
                    event_count,
                });
            }
        }
    }

    log::info!("sessions: {} records expanded", sessions.len());
    sessions
}
