//! # SatRisk Colormap
//!
//! Turns index and risk grids into RGB images.
//!
//! Eight named schemes map an 8-bit intensity to a color (see
//! [`ColorScheme`]). [`colorize`] handles non-finite cells and optional
//! min/max normalization before applying a scheme; [`risk_to_rgb`] renders a
//! risk grid as a green (safe) to red (critical) gradient. Both return a
//! [`ColorRaster`] that can be encoded as PNG.
//!
//! ## Usage
//!
//! ```ignore
//! use satrisk_colormap::{colorize, ColorScheme};
//!
//! let img = colorize(&ndvi, ColorScheme::Green, true, Some(-1.0), Some(1.0));
//! img.write_png("ndvi.png")?;
//! ```

mod render;
mod scheme;

pub use render::{
    colorize, colorize_array, intensities, risk_to_rgb, risk_to_rgb_array, ColorRaster,
    RISK_GRADIENT,
};
pub use scheme::{evaluate, ColorScheme, Rgb};
