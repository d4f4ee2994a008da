//! growthsim-core — a generative engine for synthetic SaaS user-activity
//! history.
//!
//! A small set of growth parameters (start population, YoY growth rate,
//! DAU drift/volatility) is expanded top-down into a daily aggregate
//! trajectory, then bottom-up into per-user lifecycles and session
//! records whose aggregates are calibrated back to the trajectory.
//!
//! PIPELINE (fixed order, never reordered):
//!   1. growth_curve — daily total-user counts + DAU fraction series
//!   2. cohort       — daily signup counts, exact reconciliation
//!   3. lifecycle    — per-user activity calendars + churn
//!   4. session      — per-active-user-day session records
//!   5. dataset      — validated, sorted output tables
//!
//! All randomness flows through the RngBank; two runs with the same
//! config produce byte-identical output tables.

pub mod cohort;
pub mod config;
pub mod dataset;
pub mod demographics;
pub mod engine;
pub mod error;
pub mod growth_curve;
pub mod lifecycle;
pub mod random_walk;
pub mod rng;
pub mod session;
pub mod types;
