//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through StreamRng instances derived from the
//! single master seed in the run's config.
//!
//! Each pipeline stage gets its own RNG stream, seeded deterministically
//! from (master_seed XOR stream_index). This means:
//!   - Adding a new stream never changes existing streams' draws.
//!   - Growth noise and engagement drift are statistically independent.
//!   - Each stage is fully reproducible in isolation, which leaves the
//!     door open to sampling independent users in parallel later.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single pipeline stage.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream RNG from the master seed and a stable stream
    /// index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Sample from normal(mean, std) via Box-Muller.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + std * z
    }

    /// Sample from a skew-normal distribution (Azzalini construction):
    /// two standard normals combined through the shape parameter.
    /// shape = 0 degenerates to normal(loc, scale).
    pub fn skew_normal(&mut self, loc: f64, scale: f64, shape: f64) -> f64 {
        let z0 = self.normal(0.0, 1.0);
        let z1 = self.normal(0.0, 1.0);
        let delta = shape / (1.0 + shape * shape).sqrt();
        let x = delta * z0.abs() + (1.0 - delta * delta).sqrt() * z1;
        loc + scale * x
    }

    /// Sample a Poisson count (Knuth's product method).
    /// Intended for small lambda (per-day session bursts).
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }
        let limit = (-lambda).exp();
        let mut k = 0u64;
        let mut product = 1.0;
        loop {
            product *= self.next_f64();
            if product <= limit {
                return k;
            }
            k += 1;
        }
    }

    /// Sample from a simplified Pareto distribution.
    /// x_min: minimum value, alpha: shape parameter (higher = less skewed).
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }
}

/// All stream RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    GrowthNoise = 0,
    Engagement = 1,
    Identity = 2,
    Stickiness = 3,
    Demographics = 4,
    Activity = 5,
    Session = 6,
    // Add new streams here — append only.
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GrowthNoise => "growth_noise",
            Self::Engagement => "engagement",
            Self::Identity => "identity",
            Self::Stickiness => "stickiness",
            Self::Demographics => "demographics",
            Self::Activity => "activity",
            Self::Session => "session",
        }
    }
}
