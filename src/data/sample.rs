//! Synthetic oscillatory sample generation.
//!
//! Used by the `demo` subcommand and the end-to-end tests: a seeded,
//! deterministic stand-in for the two-column files the tool normally reads.
//! The generated pairs are *raw* (unsorted, possibly duplicated x), so the
//! pipeline exercises the sanitizer exactly as it would on file input.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// Settings for one synthetic dataset.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    pub x_min: f64,
    pub x_max: f64,
    /// Sine amplitude.
    pub amplitude: f64,
    /// Oscillation frequency (cycles per unit x).
    pub frequency: f64,
    /// Phase offset (radians).
    pub phase: f64,
    /// Linear trend slope added on top of the oscillation.
    pub trend: f64,
    /// Standard deviation of the additive Gaussian noise.
    pub noise_sigma: f64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            x_min: 0.0,
            x_max: 10.0,
            amplitude: 1.0,
            frequency: 1.0 / std::f64::consts::TAU,
            phase: 0.0,
            trend: 0.0,
            noise_sigma: 0.05,
        }
    }
}

/// Generate raw `(x, y)` pairs for `y = A sin(2π f x + φ) + trend·x + noise`.
///
/// Sampling is uneven: x positions are drawn uniformly over the range and
/// left unsorted. Deterministic per seed.
pub fn generate_sample(spec: &SampleSpec) -> Result<Vec<(f64, f64)>, AppError> {
    if spec.count == 0 {
        return Err(AppError::config("Sample count must be > 0."));
    }
    if !(spec.x_min.is_finite() && spec.x_max.is_finite() && spec.x_max > spec.x_min) {
        return Err(AppError::config(format!(
            "Invalid x-range for sample generation: [{}, {}].",
            spec.x_min, spec.x_max
        )));
    }
    if !(spec.amplitude.is_finite() && spec.frequency.is_finite() && spec.frequency > 0.0) {
        return Err(AppError::config("Invalid amplitude/frequency settings."));
    }
    if !(spec.phase.is_finite() && spec.trend.is_finite()) {
        return Err(AppError::config("Invalid phase/trend settings."));
    }
    if !(spec.noise_sigma.is_finite() && spec.noise_sigma >= 0.0) {
        return Err(AppError::config("Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;

    let omega = std::f64::consts::TAU * spec.frequency;
    let mut pairs = Vec::with_capacity(spec.count);
    for _ in 0..spec.count {
        let x = rng.gen_range(spec.x_min..=spec.x_max);
        let noise = spec.noise_sigma * normal.sample(&mut rng);
        let y = spec.amplitude * (omega * x + spec.phase).sin() + spec.trend * x + noise;
        pairs.push((x, y));
    }

    Ok(pairs)
}
