//! User lifecycle sampling — expands cohorts into individual users with
//! per-day activity calendars, calibrated day by day so the aggregate
//! active count matches the trajectory's DAU target.
//!
//! Retention model: each user draws one latent "stickiness" score at
//! signup. On day d the trajectory's active-count target is split
//! across the alive pool in proportion to stickiness,
//! p_u(d) = clamp(s_u * target(d) / sum of alive s, 0.995),
//! so the expected aggregate tracks the DAU target even as churn and
//! new cohorts reshape the pool.
//!
//! Churn: after `churn_inactivity_days` consecutive inactive days the
//! user churns and is never simulated again. churn_date is the user's
//! last active date (signup date if they were never active).
//!
//! Calibration is the crux of the top-down/bottom-up design: per-date
//! independent sampling never lands exactly on the aggregate target,
//! so `calibrate_day` flips a minimal set of least-confident users.
//! The day loop is inherently sequential (each day's correction depends
//! on that day's sampled aggregate); the per-user draws inside a day
//! are independent.

use crate::{
    cohort::Cohort,
    config::SimConfig,
    demographics,
    error::{SimError, SimResult},
    growth_curve::GrowthTrajectory,
    rng::{RngBank, StreamSlot},
    types::{DayIndex, UserId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fully sampled user. Read-only downstream of this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub signup_date: NaiveDate,
    pub churn_date: Option<NaiveDate>,
    pub stickiness: f64,
    pub age: u32,
    pub country: String,
    /// One flag per day of the run; false outside
    /// [signup_date, churn_date or end of run].
    pub activity: Vec<bool>,
}

impl User {
    pub fn is_churned(&self) -> bool {
        self.churn_date.is_some()
    }
}

/// Working state during the day loop.
struct UserState {
    user_id: UserId,
    signup_day: DayIndex,
    stickiness: f64,
    age: u32,
    country: String,
    activity: Vec<bool>,
    inactive_streak: u32,
    last_active: Option<DayIndex>,
    churned: bool,
}

pub fn sample(
    config: &SimConfig,
    cohorts: &[Cohort],
    trajectory: &GrowthTrajectory,
    bank: &RngBank,
) -> SimResult<Vec<User>> {
    let days = trajectory.len();

    let mut id_rng = bank.for_stream(StreamSlot::Identity);
    let mut stick_rng = bank.for_stream(StreamSlot::Stickiness);
    let mut demo_rng = bank.for_stream(StreamSlot::Demographics);
    let mut activity_rng = bank.for_stream(StreamSlot::Activity);

    // Instantiate signup_count users per cohort, in cohort order so
    // the id stream stays stable across runs.
    let mut users: Vec<UserState> = Vec::new();
    for cohort in cohorts {
        let signup_day = trajectory.day_index(cohort.signup_date).ok_or_else(|| {
            SimError::Validation(format!(
                "cohort date {} outside the run's date range",
                cohort.signup_date
            ))
        })?;
        for _ in 0..cohort.signup_count {
            let user_id = Uuid::from_u64_pair(id_rng.next_u64(), id_rng.next_u64()).to_string();
            let stickiness = stick_rng
                .normal(config.stickiness_mean, config.stickiness_std)
                .clamp(0.05, 1.0);
            users.push(UserState {
                user_id,
                signup_day,
                stickiness,
                age: demographics::sample_age(&config.demographics, &mut demo_rng),
                country: demographics::sample_country(&config.demographics, &mut demo_rng),
                activity: vec![false; days],
                inactive_streak: 0,
                last_active: None,
                churned: false,
            });
        }
    }

    for day in 0..days {
        // Users alive on this day: signed up, not yet churned.
        let eligible: Vec<usize> = (0..users.len())
            .filter(|&i| !users[i].churned && users[i].signup_day <= day)
            .collect();

        let target = trajectory.target_active(day) as usize;

        // The target is split over the alive pool, not the full
        // population: churned users must not dilute the per-user
        // pressure, or the target drifts out of reach as the pool
        // thins over a long run.
        let stickiness_total: f64 = eligible.iter().map(|&i| users[i].stickiness).sum();

        let mut statuses = Vec::with_capacity(eligible.len());
        let mut margins = Vec::with_capacity(eligible.len());
        for &i in &eligible {
            let p = if stickiness_total > 0.0 {
                (users[i].stickiness * target as f64 / stickiness_total).clamp(0.0, 0.995)
            } else {
                0.0
            };
            let roll = activity_rng.next_f64();
            statuses.push(roll < p);
            // Distance from the decision threshold: small margin means
            // a borderline draw, the cheapest kind to flip.
            margins.push((roll - p).abs());
        }

        let sampled = statuses.iter().filter(|s| **s).count();
        let budget = (config.max_flip_fraction * eligible.len() as f64).ceil() as usize;

        match calibrate_day(target, &mut statuses, &margins, budget) {
            Ok(flips) if flips > 0 => {
                log::debug!(
                    "day {day}: calibrated {sampled} -> {target} active ({flips} flips)"
                );
            }
            Ok(_) => {}
            Err(gap) => {
                log::warn!(
                    "day {day}: cannot close active-count gap of {gap} (budget {budget})"
                );
                return Err(SimError::Reconciliation {
                    date: trajectory.dates[day],
                    target: target as u64,
                    sampled: sampled as u64,
                    eligible: eligible.len() as u64,
                    budget: budget as u64,
                });
            }
        }

        // Commit the calibrated statuses; update streaks and churn.
        for (slot, &i) in eligible.iter().enumerate() {
            let user = &mut users[i];
            if statuses[slot] {
                user.activity[day] = true;
                user.inactive_streak = 0;
                user.last_active = Some(day);
            } else {
                user.inactive_streak += 1;
                if user.inactive_streak >= config.churn_inactivity_days {
                    user.churned = true;
                }
            }
        }
    }

    let churned = users.iter().filter(|u| u.churned).count();
    log::info!("lifecycle: {} users sampled, {churned} churned", users.len());

    Ok(users
        .into_iter()
        .map(|u| {
            let churn_date = u
                .churned
                .then(|| trajectory.dates[u.last_active.unwrap_or(u.signup_day)]);
            User {
                user_id: u.user_id,
                signup_date: trajectory.dates[u.signup_day],
                churn_date,
                stickiness: u.stickiness,
                age: u.age,
                country: u.country,
                activity: u.activity,
            }
        })
        .collect())
}

/// Close the gap between `target` and the sampled active count by
/// flipping the least-confident statuses: smallest margin first, index
/// order on ties, touching at most `max_flips` entries.
///
/// Returns the number of flips applied, or Err(gap) when the gap
/// exceeds the flip budget or the number of flippable entries.
pub fn calibrate_day(
    target: usize,
    statuses: &mut [bool],
    margins: &[f64],
    max_flips: usize,
) -> Result<usize, usize> {
    assert_eq!(
        statuses.len(),
        margins.len(),
        "statuses and margins must be parallel"
    );

    let active = statuses.iter().filter(|s| **s).count();
    let want_active = target > active;
    let gap = if want_active {
        target - active
    } else {
        active - target
    };
    if gap == 0 {
        return Ok(0);
    }

    // Entries on the wrong side of the target are flip candidates.
    let mut candidates: Vec<usize> = (0..statuses.len())
        .filter(|&i| statuses[i] != want_active)
        .collect();
    if gap > candidates.len() || gap > max_flips {
        return Err(gap);
    }

    candidates.sort_by(|&a, &b| {
        margins[a]
            .partial_cmp(&margins[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &i in candidates.iter().take(gap) {
        statuses[i] = want_active;
    }

    Ok(gap)
}
