//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// Float cells mark invalid pixels with NaN or infinities; integer cells
/// are always valid.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Whether this cell holds a usable (finite) value
    fn is_valid(&self) -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn is_valid(&self) -> bool {
                true
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn is_valid(&self) -> bool {
                self.is_finite()
            }
        }
    };
}

impl_raster_element_int!(i16);
impl_raster_element_int!(i32);
impl_raster_element_int!(u8);
impl_raster_element_int!(u16);
impl_raster_element_int!(u32);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_validity() {
        assert!(1.5f64.is_valid());
        assert!(!f64::NAN.is_valid());
        assert!(!f64::INFINITY.is_valid());
        assert!(!f32::NEG_INFINITY.is_valid());
    }

    #[test]
    fn integers_always_valid() {
        assert!(0u8.is_valid());
        assert!(i32::MIN.is_valid());
        assert_eq!(200u8.to_f64(), Some(200.0));
    }
}
