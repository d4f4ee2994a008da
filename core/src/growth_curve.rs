//! Aggregate trajectory generation — total-user counts and the DAU
//! fraction series, one entry per day of the run.
//!
//! The total-user curve is the smooth compounding target
//! start_users * (1 + rate)^(days/365) with a bounded multiplicative
//! jitter walk on top, rounded to integers and forced monotonic
//! (cumulative signups never shrink). The DAU fraction is a separate
//! random walk on an independent RNG stream, so growth noise and
//! engagement drift never correlate.

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    random_walk,
    rng::{RngBank, StreamSlot},
    types::DayIndex,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthTrajectory {
    pub dates: Vec<NaiveDate>,
    pub total_users: Vec<u64>,
    pub dau_fraction: Vec<f64>,
}

impl GrowthTrajectory {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Day index of `date` within the run, if it falls in range.
    pub fn day_index(&self, date: NaiveDate) -> Option<DayIndex> {
        let first = *self.dates.first()?;
        let offset = (date - first).num_days();
        if offset < 0 || offset as usize >= self.len() {
            return None;
        }
        Some(offset as usize)
    }

    /// Target active-user count for a day: total_users * dau_fraction,
    /// rounded to the nearest integer.
    pub fn target_active(&self, day: DayIndex) -> u64 {
        (self.total_users[day] as f64 * self.dau_fraction[day]).round() as u64
    }
}

pub fn generate(config: &SimConfig, bank: &RngBank) -> SimResult<GrowthTrajectory> {
    let days = config.num_days();
    if days < 1 {
        return Err(SimError::Config(format!(
            "empty date range: [{}, {})",
            config.start_date, config.end_date
        )));
    }
    let days = days as usize;

    let dates: Vec<NaiveDate> = (0..days)
        .map(|d| config.start_date + Duration::days(d as i64))
        .collect();

    // Multiplicative jitter around the smooth curve. Drift-free and
    // hard-bounded, so the end count stays within tolerance of the
    // compounding target for every seed.
    let mut growth_rng = bank.for_stream(StreamSlot::GrowthNoise);
    let jitter = random_walk::generate(
        days,
        0.0,
        0.0,
        config.growth_volatility,
        -config.growth_noise_bound,
        config.growth_noise_bound,
        &mut growth_rng,
    );

    // Growth rates at or below -100% would drive the compounding base
    // negative; clamp the base at zero and let user_floor catch the
    // resulting zero counts.
    let base = (1.0 + config.approx_yoy_growth_rate).max(0.0);
    let floor = config.user_floor as f64;

    let mut total_users = Vec::with_capacity(days);
    let mut running = config.start_users.max(config.user_floor);
    for d in 0..days {
        let smooth = config.start_users as f64 * base.powf(d as f64 / 365.0);
        let target = if d == 0 {
            // Day 0 is pinned: total_users(start_date) == start_users.
            config.start_users as f64
        } else {
            smooth * (1.0 + jitter[d])
        };
        let candidate = target.round().max(floor) as u64;
        // Never let a rounding or jitter artifact decrease the total.
        running = running.max(candidate);
        total_users.push(running);
    }

    let mut engagement_rng = bank.for_stream(StreamSlot::Engagement);
    let dau_fraction = random_walk::generate(
        days,
        config.dau_fraction_initial,
        config.dau_drift,
        config.dau_volatility,
        config.dau_fraction_min,
        config.dau_fraction_max,
        &mut engagement_rng,
    );

    log::info!(
        "trajectory: {} days, users {} -> {}, dau {:.3} -> {:.3}",
        days,
        total_users.first().copied().unwrap_or_default(),
        total_users.last().copied().unwrap_or_default(),
        dau_fraction.first().copied().unwrap_or_default(),
        dau_fraction.last().copied().unwrap_or_default(),
    );

    Ok(GrowthTrajectory {
        dates,
        total_users,
        dau_fraction,
    })
}
