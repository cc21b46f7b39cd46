//! Raster data structures and operations

mod element;
mod grid;
mod mask;

pub use element::RasterElement;
pub use grid::{Raster, RasterStatistics};
pub use mask::ValidityMask;
