//! Deterministic user account attributes (age, country).
//!
//! Ages follow a right-skewed distribution clamped to a configured
//! range; countries are a weighted pick. Same RNG stream = same
//! attributes, run after run.

use crate::{config::DemographicsParams, rng::StreamRng};

pub fn sample_age(params: &DemographicsParams, rng: &mut StreamRng) -> u32 {
    let raw = rng.skew_normal(params.age_loc, params.age_scale, params.age_shape);
    (raw.round() as i64).clamp(params.age_min as i64, params.age_max as i64) as u32
}

pub fn sample_country(params: &DemographicsParams, rng: &mut StreamRng) -> String {
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for (country, weight) in &params.countries {
        cumulative += weight;
        if roll < cumulative {
            return country.clone();
        }
    }
    // Weights sum to ~1; a float shortfall lands on the last entry.
    params.countries.last().map(|(c, _)| c.clone()).unwrap_or_default()
}
