//! Run configuration — every knob the engine exposes, validated up
//! front so generation never starts from an inconsistent parameter set.

use crate::error::{SimError, SimResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_growth_volatility() -> f64 {
    0.002
}
fn default_growth_noise_bound() -> f64 {
    0.02
}
fn default_user_floor() -> u64 {
    1
}
fn default_dau_fraction_min() -> f64 {
    0.01
}
fn default_dau_fraction_max() -> f64 {
    0.95
}
fn default_stickiness_mean() -> f64 {
    0.5
}
fn default_stickiness_std() -> f64 {
    0.15
}
fn default_churn_inactivity_days() -> u32 {
    21
}
fn default_max_flip_fraction() -> f64 {
    0.25
}

/// Immutable run configuration. Constructed once, validated once,
/// never mutated by the run that consumes it.
///
/// The date range is half-open: [start_date, end_date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// YoY growth rate as a delta, e.g. 2.0 for +200% (3x in a year).
    pub approx_yoy_growth_rate: f64,
    /// Total users on start_date.
    pub start_users: u64,
    /// Per-day volatility of the multiplicative jitter on the smooth
    /// compounding curve.
    #[serde(default = "default_growth_volatility")]
    pub growth_volatility: f64,
    /// Hard bound on the jitter walk; keeps the realized end count
    /// within the documented tolerance of the compounding target.
    #[serde(default = "default_growth_noise_bound")]
    pub growth_noise_bound: f64,
    /// Lowest total-user count the trajectory may report. Protects
    /// decline scenarios (growth rate <= -1.0) from invalid counts.
    #[serde(default = "default_user_floor")]
    pub user_floor: u64,

    /// DAU fraction on start_date, in (0, 1).
    pub dau_fraction_initial: f64,
    /// Systematic per-day change of the DAU fraction walk.
    pub dau_drift: f64,
    /// Per-day noise of the DAU fraction walk.
    pub dau_volatility: f64,
    #[serde(default = "default_dau_fraction_min")]
    pub dau_fraction_min: f64,
    #[serde(default = "default_dau_fraction_max")]
    pub dau_fraction_max: f64,

    /// Mean of the per-user latent stickiness score. Relative
    /// stickiness decides each alive user's share of the daily
    /// active-count target.
    #[serde(default = "default_stickiness_mean")]
    pub stickiness_mean: f64,
    #[serde(default = "default_stickiness_std")]
    pub stickiness_std: f64,
    /// Consecutive inactive days after which a user churns.
    #[serde(default = "default_churn_inactivity_days")]
    pub churn_inactivity_days: u32,
    /// Largest fraction of a day's eligible users the calibration step
    /// may flip before the run fails with a Reconciliation error.
    #[serde(default = "default_max_flip_fraction")]
    pub max_flip_fraction: f64,

    #[serde(default)]
    pub session: SessionParams,
    #[serde(default)]
    pub demographics: DemographicsParams,

    pub seed: u64,
}

/// Distributions for per-session attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Poisson mean for sessions beyond the guaranteed first one per
    /// active user-day. Small values give mostly-single-session days
    /// with occasional bursts.
    pub burst_lambda: f64,
    /// Pareto minimum for session duration, in seconds.
    pub duration_xmin_secs: f64,
    /// Pareto shape for session duration.
    pub duration_alpha: f64,
    /// Hard cap on a single session's duration, in seconds.
    pub duration_cap_secs: f64,
    /// Poisson mean for events beyond the guaranteed first one.
    pub events_lambda: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            burst_lambda: 0.6,
            duration_xmin_secs: 90.0,
            duration_alpha: 1.6,
            duration_cap_secs: 4.0 * 3600.0,
            events_lambda: 6.0,
        }
    }
}

/// Distributions for user account attributes (age, country).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicsParams {
    /// Skew-normal location for age.
    pub age_loc: f64,
    /// Skew-normal scale for age.
    pub age_scale: f64,
    /// Skew-normal shape for age (positive = right skew).
    pub age_shape: f64,
    pub age_min: u32,
    pub age_max: u32,
    /// (country code, weight) pairs; weights must sum to ~1.
    pub countries: Vec<(String, f64)>,
}

impl Default for DemographicsParams {
    fn default() -> Self {
        Self {
            age_loc: 27.0,
            age_scale: 10.0,
            age_shape: 2.0,
            age_min: 16,
            age_max: 75,
            countries: vec![("US".into(), 0.8), ("CA".into(), 0.2)],
        }
    }
}

impl SimConfig {
    /// Number of days in the half-open [start_date, end_date) range.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Reject invalid parameter ranges before any generation begins.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_days() < 1 {
            return Err(SimError::Config(format!(
                "empty date range: [{}, {})",
                self.start_date, self.end_date
            )));
        }
        if self.start_users == 0 {
            return Err(SimError::Config("start_users must be positive".into()));
        }
        if self.user_floor == 0 {
            return Err(SimError::Config("user_floor must be positive".into()));
        }
        if self.growth_volatility < 0.0 || self.dau_volatility < 0.0 {
            return Err(SimError::Config("volatility must be >= 0".into()));
        }
        if self.growth_noise_bound < 0.0 || self.growth_noise_bound >= 1.0 {
            return Err(SimError::Config(format!(
                "growth_noise_bound must be in [0, 1): {}",
                self.growth_noise_bound
            )));
        }
        if self.dau_fraction_initial <= 0.0 || self.dau_fraction_initial >= 1.0 {
            return Err(SimError::Config(format!(
                "dau_fraction_initial must be in (0, 1): {}",
                self.dau_fraction_initial
            )));
        }
        if self.dau_fraction_min > self.dau_fraction_max
            || self.dau_fraction_min < 0.0
            || self.dau_fraction_max > 1.0
        {
            return Err(SimError::Config(format!(
                "bad DAU fraction bounds: [{}, {}]",
                self.dau_fraction_min, self.dau_fraction_max
            )));
        }
        if self.stickiness_mean <= 0.0 {
            return Err(SimError::Config("stickiness_mean must be positive".into()));
        }
        if self.stickiness_std < 0.0 {
            return Err(SimError::Config("stickiness_std must be >= 0".into()));
        }
        if self.churn_inactivity_days == 0 {
            return Err(SimError::Config(
                "churn_inactivity_days must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_flip_fraction) {
            return Err(SimError::Config(format!(
                "max_flip_fraction must be in [0, 1]: {}",
                self.max_flip_fraction
            )));
        }

        let s = &self.session;
        if s.burst_lambda < 0.0 || s.events_lambda < 0.0 {
            return Err(SimError::Config("session lambdas must be >= 0".into()));
        }
        if s.duration_xmin_secs <= 0.0
            || s.duration_alpha <= 0.0
            || s.duration_cap_secs < s.duration_xmin_secs
        {
            return Err(SimError::Config("bad session duration parameters".into()));
        }

        let d = &self.demographics;
        if d.age_min > d.age_max {
            return Err(SimError::Config("age_min > age_max".into()));
        }
        if d.countries.is_empty() {
            return Err(SimError::Config("countries must not be empty".into()));
        }
        let weight_sum: f64 = d.countries.iter().map(|(_, w)| w).sum();
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(SimError::Config(format!(
                "country weights must sum to 1.0, got {weight_sum:.4}"
            )));
        }

        Ok(())
    }

    /// Load from a JSON file and validate.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            approx_yoy_growth_rate: 1.0,
            start_users: 300,
            growth_volatility: default_growth_volatility(),
            growth_noise_bound: default_growth_noise_bound(),
            user_floor: default_user_floor(),
            dau_fraction_initial: 0.30,
            dau_drift: -0.0005,
            dau_volatility: 0.005,
            dau_fraction_min: default_dau_fraction_min(),
            dau_fraction_max: default_dau_fraction_max(),
            stickiness_mean: default_stickiness_mean(),
            stickiness_std: default_stickiness_std(),
            churn_inactivity_days: default_churn_inactivity_days(),
            max_flip_fraction: default_max_flip_fraction(),
            session: SessionParams::default(),
            demographics: DemographicsParams::default(),
            seed: 42,
        }
    }
}
