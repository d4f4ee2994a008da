//! growth-runner: headless runner for the SaaS growth data generator.
//!
//! Usage:
//!   growth-runner --seed 42 --out ./out
//!   growth-runner --config run.json --out ./out
//!
//! Writes users.csv and sessions.csv to the output directory and prints
//! a run summary. This is the thin adapter around the engine; all real
//! work happens in growthsim-core.

use anyhow::Result;
use chrono::NaiveDate;
use growthsim_core::{
    config::SimConfig,
    engine::{GrowthEngine, RunOutput},
};
use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let out_dir = str_arg(&args, "--out").unwrap_or("./out");

    let mut config = match str_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => default_config(),
    };

    // Flag overrides on top of file/default config.
    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(n) = parse_arg::<u64>(&args, "--start-users") {
        config.start_users = n;
    }
    if let Some(rate) = parse_arg::<f64>(&args, "--growth-rate") {
        config.approx_yoy_growth_rate = rate;
    }
    if let Some(d) = parse_arg::<NaiveDate>(&args, "--start-date") {
        config.start_date = d;
    }
    if let Some(d) = parse_arg::<NaiveDate>(&args, "--end-date") {
        config.end_date = d;
    }

    println!("growth-runner");
    println!("  seed:        {}", config.seed);
    println!("  range:       [{}, {})", config.start_date, config.end_date);
    println!("  start_users: {}", config.start_users);
    println!("  yoy growth:  {:+.2}", config.approx_yoy_growth_rate);
    println!("  out:         {out_dir}");
    println!();

    let engine = GrowthEngine::new(config)?;
    let output = engine.run()?;

    fs::create_dir_all(out_dir)?;
    write_users_csv(&output, &format!("{out_dir}/users.csv"))?;
    write_sessions_csv(&output, &format!("{out_dir}/sessions.csv"))?;

    print_summary(&output);
    Ok(())
}

fn default_config() -> SimConfig {
    let mut config = SimConfig::default_test();
    // Runner defaults mirror the canonical demo scenario.
    config.start_date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    config.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    config.start_users = 10_000;
    config.approx_yoy_growth_rate = 2.0;
    config.dau_fraction_initial = 0.25;
    config
}

fn write_users_csv(output: &RunOutput, path: &str) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "user_id,signup_date,churn_date,is_churned,age,country")?;
    for row in &output.users.rows {
        let churn = row
            .churn_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        writeln!(
            w,
            "{},{},{},{},{},{}",
            row.user_id, row.signup_date, churn, row.is_churned, row.age, row.country
        )?;
    }
    Ok(())
}

fn write_sessions_csv(output: &RunOutput, path: &str) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "session_id,user_id,session_date,duration_secs,event_count")?;
    for row in &output.sessions.rows {
        writeln!(
            w,
            "{},{},{},{},{}",
            row.session_id, row.user_id, row.session_date, row.duration_secs, row.event_count
        )?;
    }
    Ok(())
}

fn print_summary(output: &RunOutput) {
    let traj = &output.trajectory;
    let churned = output.users.rows.iter().filter(|r| r.is_churned).count();

    println!("=== RUN SUMMARY ===");
    println!("  days:           {}", traj.len());
    println!(
        "  total users:    {} -> {}",
        traj.total_users.first().copied().unwrap_or_default(),
        traj.total_users.last().copied().unwrap_or_default()
    );
    println!(
        "  dau fraction:   {:.3} -> {:.3}",
        traj.dau_fraction.first().copied().unwrap_or_default(),
        traj.dau_fraction.last().copied().unwrap_or_default()
    );
    println!("  user rows:      {}", output.users.rows.len());
    println!("  churned:        {churned}");
    println!("  session rows:   {}", output.sessions.rows.len());
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    str_arg(args, flag).and_then(|v| v.parse().ok())
}
