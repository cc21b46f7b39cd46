//! Per-pixel sensor validity

use crate::error::{Error, Result};
use crate::raster::Raster;
use ndarray::Array2;

/// Boolean grid marking which pixels carry a usable sensor reading
/// (not cloud-obscured, inside the swath, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityMask {
    valid: Array2<bool>,
}

impl ValidityMask {
    /// A mask with every pixel valid
    pub fn all_valid(rows: usize, cols: usize) -> Self {
        Self {
            valid: Array2::from_elem((rows, cols), true),
        }
    }

    /// Build a mask from a numeric channel, `> 0` means valid
    pub fn from_channel(channel: &Raster<f64>) -> Self {
        Self {
            valid: channel.data().mapv(|v| v > 0.0),
        }
    }

    pub fn from_array(valid: Array2<bool>) -> Self {
        Self { valid }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.valid.dim()
    }

    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.valid.get((row, col)).copied().unwrap_or(false)
    }

    /// Number of valid pixels
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Fraction of valid pixels in [0, 1]; an empty mask has zero coverage
    pub fn coverage(&self) -> f64 {
        if self.valid.is_empty() {
            0.0
        } else {
            self.valid_count() as f64 / self.valid.len() as f64
        }
    }

    /// Copy `values`, replacing every masked-out pixel with NaN
    pub fn apply(&self, values: &Raster<f64>) -> Result<Raster<f64>> {
        let (er, ec) = values.shape();
        let (ar, ac) = self.shape();
        if (er, ec) != (ar, ac) {
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }

        let mut out = values.data().clone();
        ndarray::Zip::from(&mut out)
            .and(&self.valid)
            .for_each(|v, &ok| {
                if !ok {
                    *v = f64::NAN;
                }
            });
        Ok(Raster::from_array(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_from_channel() {
        let ch = Raster::from_vec(vec![1.0, 0.0, 0.5, -1.0], 2, 2).unwrap();
        let mask = ValidityMask::from_channel(&ch);
        assert!(mask.is_valid(0, 0));
        assert!(!mask.is_valid(0, 1));
        assert!(mask.is_valid(1, 0));
        assert!(!mask.is_valid(1, 1));
        assert_eq!(mask.valid_count(), 2);
        assert!((mask.coverage() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn apply_sets_nan() {
        let values = Raster::from_vec(vec![0.1, 0.2, 0.3, 0.4], 2, 2).unwrap();
        let mask = ValidityMask::from_array(
            Array2::from_shape_vec((2, 2), vec![true, false, true, true]).unwrap(),
        );
        let masked = mask.apply(&values).unwrap();
        assert_eq!(masked.get(0, 0).unwrap(), 0.1);
        assert!(masked.get(0, 1).unwrap().is_nan());
        // input untouched
        assert_eq!(values.get(0, 1).unwrap(), 0.2);
    }

    #[test]
    fn apply_rejects_mismatched_shape() {
        let values: Raster<f64> = Raster::new(2, 3);
        let mask = ValidityMask::all_valid(3, 2);
        assert!(matches!(mask.apply(&values), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn out_of_range_is_invalid() {
        let mask = ValidityMask::all_valid(1, 1);
        assert!(!mask.is_valid(4, 4));
    }
}
