//! Geographic area of interest: bounds validation, area and pixel sizing.

use crate::config::ResolutionTiers;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Build validated bounds from the south-west and north-east corners,
    /// each given as `(lon, lat)`.
    pub fn from_corners(south_west: (f64, f64), north_east: (f64, f64)) -> Result<Self> {
        let bounds = Self::new(south_west.0, south_west.1, north_east.0, north_east.1);
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check coordinate ranges and corner ordering.
    pub fn validate(&self) -> Result<()> {
        let lon_ok = |v: f64| (-180.0..=180.0).contains(&v);
        let lat_ok = |v: f64| (-90.0..=90.0).contains(&v);

        if !(lon_ok(self.min_lon) && lon_ok(self.max_lon) && lat_ok(self.min_lat) && lat_ok(self.max_lat)) {
            return Err(Error::InvalidBounds(format!(
                "({}, {}) to ({}, {}) is not a valid area on Earth",
                self.min_lon, self.min_lat, self.max_lon, self.max_lat
            )));
        }
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(Error::InvalidBounds(
                "south-west corner must lie strictly below and left of the north-east corner".into(),
            ));
        }
        Ok(())
    }

    /// Latitude of the box centre.
    pub fn center_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// East-west extent along the southern edge, in km.
    pub fn width_km(&self) -> f64 {
        haversine_km(self.min_lat, self.min_lon, self.min_lat, self.max_lon)
    }

    /// North-south extent along the western edge, in km.
    pub fn height_km(&self) -> f64 {
        haversine_km(self.min_lat, self.min_lon, self.max_lat, self.min_lon)
    }

    /// Approximate area in km².
    pub fn area_km2(&self) -> f64 {
        self.width_km() * self.height_km()
    }

    /// Pick the processing resolution for this area, rejecting areas above
    /// the tier table's maximum.
    pub fn resolution_for(&self, tiers: &ResolutionTiers) -> Result<u32> {
        let area = self.area_km2();
        if area > tiers.max_area_km2 {
            return Err(Error::AreaTooLarge {
                area_km2: area,
                max_km2: tiers.max_area_km2,
            });
        }
        Ok(tiers.resolution_for(area))
    }
}

/// Great-circle distance between two points, in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_KM
}

/// Pixel dimensions of an image request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
    /// Effective resolution in metres per pixel after any adjustment.
    pub resolution_m: f64,
}

/// Pixel dimensions for `bounds` at `resolution_m`, coarsening the
/// resolution when either side would exceed `max_dim` pixels.
pub fn image_dimensions(bounds: &Bounds, resolution_m: f64, max_dim: usize) -> ImageSize {
    let width_m = bounds.width_km() * 1000.0;
    let height_m = bounds.height_km() * 1000.0;
    let pixels = |extent: f64, res: f64| ((extent / res).round() as usize).max(1);

    let width = pixels(width_m, resolution_m);
    let height = pixels(height_m, resolution_m);
    if width <= max_dim && height <= max_dim {
        return ImageSize {
            width,
            height,
            resolution_m,
        };
    }

    let scale = (width as f64 / max_dim as f64).max(height as f64 / max_dim as f64);
    let adjusted = resolution_m * scale;
    tracing::debug!(
        requested_m = resolution_m,
        adjusted_m = adjusted,
        "area too large for requested resolution, coarsening"
    );
    ImageSize {
        width: pixels(width_m, adjusted).min(max_dim),
        height: pixels(height_m, adjusted).min(max_dim),
        resolution_m: adjusted,
    }
}
