//! Synthetic stand-in data for factors the provider could not deliver.
//!
//! Values are uniform noise of ±0.1 around a latitude-dependent base,
//! `(|lat| / 90 - 0.5) * 0.3`, and every pixel is marked valid.

use ndarray::Array3;
use rand::Rng;
use satrisk_core::{Bounds, FactorData, Result};

/// Half-width of the uniform noise band.
const NOISE: f64 = 0.1;

/// Base value of the noise band for an area, 0.0 when no area is known.
pub fn base_value(bounds: Option<&Bounds>) -> f64 {
    match bounds {
        Some(b) => (b.center_lat().abs() / 90.0 - 0.5) * 0.3,
        None => 0.0,
    }
}

/// Synthetic two-channel stack of `shape` (rows, cols).
pub fn synthetic_factor(bounds: Option<&Bounds>, shape: (usize, usize)) -> Result<FactorData> {
    synthetic_factor_with(&mut rand::thread_rng(), bounds, shape)
}

/// [`synthetic_factor`] drawing from a caller-supplied generator.
pub fn synthetic_factor_with<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: Option<&Bounds>,
    shape: (usize, usize),
) -> Result<FactorData> {
    let base = base_value(bounds);
    let (rows, cols) = shape;
    let stack = Array3::from_shape_fn((rows, cols, 2), |(_, _, channel)| {
        if channel == 0 {
            rng.gen_range(base - NOISE..base + NOISE)
        } else {
            1.0
        }
    });
    FactorData::new(stack)
}
