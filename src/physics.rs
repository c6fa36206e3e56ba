//! Particle-in-a-box quantum physics calculations
//! Stationary states of a particle confined to the interval [0, L]

use serde::Serialize;
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Number of intervals in the sampling grid (the grid has one more point)
pub const NUM_INTERVALS: usize = 200;

/// Box length used when no valid length is available
pub const DEFAULT_LENGTH: f64 = 1.0;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 10;

/// Inputs that fully determine the sampled series.
/// level: quantum number n (1..=10)
/// length: box length L (> 0)
/// normalized: whether Ψ is scaled by sqrt(2/L)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxParams {
    pub level: u32,
    pub length: f64,
    pub normalized: bool,
}

impl BoxParams {
    pub fn new(level: u32, length: f64, normalized: bool) -> Result<Self> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(Error::InvalidLevel(level as i64));
        }
        if !is_valid_length(length) {
            return Err(Error::InvalidLength(length.to_string()));
        }
        Ok(BoxParams {
            level,
            length,
            normalized,
        })
    }

    /// Length actually used for sampling. Falls back to the default when
    /// the stored length is not usable.
    pub fn effective_length(&self) -> f64 {
        if is_valid_length(self.length) {
            self.length
        } else {
            DEFAULT_LENGTH
        }
    }
}

/// Grid positions with the wave and density values at each of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledSeries {
    pub grid: Vec<f64>,
    pub wave: Vec<f64>,
    pub density: Vec<f64>,
}

impl SampledSeries {
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// (x, Ψ, |Ψ|²) triples in grid order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid
            .iter()
            .zip(&self.wave)
            .zip(&self.density)
            .map(|((&x, &psi), &prob)| (x, psi, prob))
    }
}

/// A box length the sampler and axis scaler can work with: finite, positive,
/// and large enough that 2/L (with axis headroom on top) stays finite.
pub fn is_valid_length(length: f64) -> bool {
    length.is_finite() && length > 0.0 && (4.0 / length).is_finite()
}

/// Amplitude scale factor: sqrt(2/L) when normalized, 1 otherwise
pub fn amplitude_factor(length: f64, normalized: bool) -> f64 {
    if normalized {
        (2.0 / length).sqrt()
    } else {
        1.0
    }
}

/// Wave function Ψ_n(x) for a particle in a box of length L.
/// Zero outside [0, L].
pub fn evaluate_wave(x: f64, n: u32, length: f64, normalized: bool) -> f64 {
    if x < 0.0 || x > length || length <= 0.0 {
        return 0.0;
    }

    let factor = amplitude_factor(length, normalized);
    factor * (n as f64 * PI * (x / length)).sin()
}

/// Probability density |Ψ|²
pub fn evaluate_density(wave_value: f64) -> f64 {
    wave_value * wave_value
}

/// `count + 1` evenly spaced positions from 0 to L, endpoints exact.
pub fn build_grid(length: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    // divide first: i·L overflows for L near f64::MAX
    let step = length / count as f64;
    let mut xs = Vec::with_capacity(count + 1);
    for i in 0..count {
        xs.push(i as f64 * step);
    }
    // i·L/count at i = count can round away from L
    xs.push(length);
    xs
}

/// Sample Ψ and |Ψ|² over the standard grid
pub fn sample_series(params: BoxParams) -> SampledSeries {
    let length = params.effective_length();
    let grid = build_grid(length, NUM_INTERVALS);
    let wave: Vec<f64> = grid
        .iter()
        .map(|&x| evaluate_wave(x, params.level, length, params.normalized))
        .collect();
    let density = wave.iter().copied().map(evaluate_density).collect();

    SampledSeries {
        grid,
        wave,
        density,
    }
}
