//! Spatial alignment
//!
//! Factors fetched independently may come back at slightly different pixel
//! sizes. Before they can be combined, each grid is resampled onto the
//! reference shape with first-order (bilinear) interpolation using the
//! corner-aligned mapping `src = dst * (in - 1) / (out - 1)`: the first and
//! last pixel centres of both grids coincide, nothing is extrapolated.

use crate::maybe_rayon::*;
use ndarray::Array2;
use satrisk_core::Raster;
use std::borrow::Cow;

/// Resample `grid` to `target_shape` (rows, cols).
///
/// Returns the input unchanged (borrowed) when it already has the target
/// shape. Non-finite source cells only affect output cells that give them a
/// non-zero weight. An empty source or target yields a NaN grid of the
/// target shape.
pub fn align(grid: &Raster<f64>, target_shape: (usize, usize)) -> Cow<'_, Raster<f64>> {
    if grid.shape() == target_shape {
        return Cow::Borrowed(grid);
    }

    let (out_rows, out_cols) = target_shape;
    if grid.is_empty() || out_rows == 0 || out_cols == 0 {
        return Cow::Owned(Raster::filled(out_rows, out_cols, f64::NAN));
    }

    tracing::debug!(
        from = ?grid.shape(),
        to = ?target_shape,
        "aligning grid to reference shape"
    );

    let (in_rows, in_cols) = grid.shape();
    let row_taps = axis_taps(in_rows, out_rows);
    let col_taps = axis_taps(in_cols, out_cols);

    let data: Vec<f64> = (0..out_rows)
        .into_par_iter()
        .flat_map(|row| {
            let r = row_taps[row];
            col_taps
                .iter()
                .map(|c| sample(grid, r, *c))
                .collect::<Vec<f64>>()
        })
        .collect();

    let array = Array2::from_shape_vec(target_shape, data)
        .unwrap_or_else(|_| Array2::from_elem(target_shape, f64::NAN));
    Cow::Owned(Raster::from_array(array))
}

/// Interpolation taps along one axis: lower index, upper index, fraction
/// towards the upper index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f64,
}

fn axis_taps(in_len: usize, out_len: usize) -> Vec<Tap> {
    let last = in_len - 1;
    // A single output pixel samples the first source pixel.
    let scale = if out_len > 1 {
        last as f64 / (out_len - 1) as f64
    } else {
        1.0
    };

    (0..out_len)
        .map(|dst| {
            let src = (dst as f64 * scale).clamp(0.0, last as f64);
            let lo = (src.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            Tap {
                lo,
                hi,
                frac: src - lo as f64,
            }
        })
        .collect()
}

fn sample(grid: &Raster<f64>, r: Tap, c: Tap) -> f64 {
    let taps = [
        (r.lo, c.lo, (1.0 - r.frac) * (1.0 - c.frac)),
        (r.lo, c.hi, (1.0 - r.frac) * c.frac),
        (r.hi, c.lo, r.frac * (1.0 - c.frac)),
        (r.hi, c.hi, r.frac * c.frac),
    ];

    let mut acc = 0.0;
    for (row, col, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        // SAFETY: taps are clamped to the source shape in `axis_taps`
        let v = unsafe { grid.get_unchecked(row, col) };
        if !v.is_finite() {
            return f64::NAN;
        }
        acc += weight * v;
    }
    acc
}
