//! The generation engine — wires the pipeline stages together.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. growth_curve — aggregate trajectory (totals + DAU fraction)
//!   2. cohort       — signup allocation
//!   3. lifecycle    — per-user activity calendars
//!   4. session      — session expansion
//!   5. dataset      — validated output tables
//!
//! RULES:
//!   - Each stage consumes its upstream stage's fully materialized
//!     output; nothing is streamed or revisited.
//!   - All randomness flows through the RngBank.
//!   - A run either completes deterministically for its seed or fails
//!     outright; there are no retries and no partial output.

use crate::{
    cohort::{self, Cohort},
    config::SimConfig,
    dataset::{self, SessionTable, UserTable},
    error::SimResult,
    growth_curve::{self, GrowthTrajectory},
    lifecycle, session,
    rng::RngBank,
};

/// Everything a completed run produces. Immutable once returned.
pub struct RunOutput {
    pub trajectory: GrowthTrajectory,
    pub cohorts: Vec<Cohort>,
    pub users: UserTable,
    pub sessions: SessionTable,
}

pub struct GrowthEngine {
    config: SimConfig,
    rng_bank: RngBank,
}

impl GrowthEngine {
    /// Validate the config and build an engine. Fails with a Config
    /// error before any generation begins.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(config.seed);
        Ok(Self { config, rng_bank })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Execute one full generation run.
    pub fn run(&self) -> SimResult<RunOutput> {
        log::info!(
            "run: seed={} range=[{}, {}) start_users={} yoy={:+.2}",
            self.config.seed,
            self.config.start_date,
            self.config.end_date,
            self.config.start_users,
            self.config.approx_yoy_growth_rate,
        );

        let trajectory = growth_curve::generate(&self.config, &self.rng_bank)?;
        let cohorts = cohort::allocate(&trajectory);
        let users = lifecycle::sample(&self.config, &cohorts, &trajectory, &self.rng_bank)?;
        let sessions = session::expand(&self.config, &users, &trajectory, &self.rng_bank);
        let (user_table, session_table) = dataset::assemble(&users, sessions, &trajectory)?;

        Ok(RunOutput {
            trajectory,
            cohorts,
            users: user_table,
            sessions: session_table,
        })
    }
}
