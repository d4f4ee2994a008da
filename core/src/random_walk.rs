//! Bounded random walk with drift — the stochastic primitive behind
//! both the DAU-fraction series and the growth-curve jitter.
//!
//! Clamping policy: out-of-range steps SATURATE at the bounds rather
//! than reflecting. A walk pinned at a bound stays there until drift
//! plus noise pulls it back inside.

use crate::rng::StreamRng;

/// Generate a series of exactly `length` values.
///
/// value[0] = clamp(initial); value[t] = clamp(value[t-1] + drift + noise),
/// noise ~ normal(0, volatility). Fully determined by the stream's seed.
/// A zero volatility skips the noise draw entirely, leaving a pure
/// drift line (useful for tests and degenerate configs).
pub fn generate(
    length: usize,
    initial: f64,
    drift: f64,
    volatility: f64,
    lower_bound: f64,
    upper_bound: f64,
    rng: &mut StreamRng,
) -> Vec<f64> {
    assert!(
        lower_bound <= upper_bound,
        "walk bounds inverted: {lower_bound} > {upper_bound}"
    );

    let mut series = Vec::with_capacity(length);
    if length == 0 {
        return series;
    }

    let mut value = initial.clamp(lower_bound, upper_bound);
    series.push(value);

    for _ in 1..length {
        let noise = if volatility > 0.0 {
            rng.normal(0.0, volatility)
        } else {
            0.0
        };
        value = (value + drift + noise).clamp(lower_bound, upper_bound);
        series.push(value);
    }

    series
}
