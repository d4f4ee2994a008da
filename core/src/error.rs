use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid parameter ranges, raised before any generation begins.
    #[error("invalid config: {0}")]
    Config(String),

    /// The per-date calibration step could not close the gap between
    /// the target active count and the sampled active count within the
    /// configured flip budget. Signals a mis-specified config.
    #[error(
        "reconciliation failed on {date}: target {target} active users, \
         sampled {sampled} of {eligible} eligible, flip budget {budget}"
    )]
    Reconciliation {
        date: NaiveDate,
        target: u64,
        sampled: u64,
        eligible: u64,
        budget: u64,
    },

    /// An output-table invariant was violated during assembly.
    /// Always an internal defect, never a user error.
    #[error("dataset validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
