//! Cohort signup allocation — daily signup counts derived from the
//! total-user trajectory by exact differencing. No randomness here:
//! the allocation is fully determined by the trajectory, and cumulative
//! signups reconcile exactly with total_users(d) for every day.

use crate::growth_curve::GrowthTrajectory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A group of users sharing a signup date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    pub signup_date: NaiveDate,
    pub signup_count: u64,
}

pub fn allocate(trajectory: &GrowthTrajectory) -> Vec<Cohort> {
    let mut cohorts = Vec::with_capacity(trajectory.len());
    let mut prev_total = 0u64;

    for (i, (&signup_date, &total)) in trajectory
        .dates
        .iter()
        .zip(&trajectory.total_users)
        .enumerate()
    {
        // The start-date cohort absorbs the entire starting population.
        // Totals are monotonic, so the difference never underflows.
        let signup_count = if i == 0 { total } else { total - prev_total };
        cohorts.push(Cohort {
            signup_date,
            signup_count,
        });
        prev_total = total;
    }

    cohorts
}
