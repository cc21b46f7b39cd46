//! Error types for SatRisk

use thiserror::Error;

/// Main error type for SatRisk core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid input shape: expected a {expected}-D array, got shape {actual:?}")]
    InvalidShape { expected: usize, actual: Vec<usize> },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Invalid coordinates: {0}")]
    InvalidBounds(String),

    #[error("Area too large: {area_km2:.0} km² exceeds the {max_km2:.0} km² limit")]
    AreaTooLarge { area_km2: f64, max_km2: f64 },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Tiff(e.to_string())
    }
}

/// Result type alias for SatRisk core operations
pub type Result<T> = std::result::Result<T, Error>;
