//! Named color schemes.
//!
//! Every scheme maps an 8-bit intensity `v` to an RGB triple using integer
//! arithmetic, so identical inputs always produce identical pixels.

use std::fmt;
use std::str::FromStr;

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    /// R = G = B
    #[default]
    Gray,
    /// Red channel only (fire, burn areas)
    Red,
    /// Green channel only (vegetation)
    Green,
    /// Blue fading out of a white background (moisture)
    Blue,
    /// Amplified blue with a faster white fade (floods)
    WaterBlue,
    /// Blue → purple → red → yellow
    Heat,
    /// Moderate red, boosted blue (built-up areas)
    Purple,
    /// Brown (dry) → green-blue → blue (wet)
    BlueToBrown,
}

impl ColorScheme {
    pub const ALL: &[ColorScheme] = &[
        Self::Gray,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::WaterBlue,
        Self::Heat,
        Self::Purple,
        Self::BlueToBrown,
    ];

    /// Scheme identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::WaterBlue => "water_blue",
            Self::Heat => "heat",
            Self::Purple => "purple",
            Self::BlueToBrown => "blue_to_brown",
        }
    }

    /// Look a scheme up by identifier. Unknown names render as gray.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .unwrap_or_else(|| {
                tracing::debug!(scheme = name, "unknown color scheme, using gray");
                Self::Gray
            })
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

#[inline]
fn clip(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Color for intensity `v` under `scheme`.
pub fn evaluate(scheme: ColorScheme, v: u8) -> Rgb {
    let i = v as i32;
    match scheme {
        ColorScheme::Gray => Rgb::new(v, v, v),
        ColorScheme::Red => Rgb::new(v, 0, 0),
        ColorScheme::Green => Rgb::new(0, v, 0),
        ColorScheme::Blue => Rgb::new(255 - v, 255 - v, v),
        ColorScheme::WaterBlue => {
            let fade = clip(255 - 3 * i);
            Rgb::new(fade, fade, clip(2 * i))
        }
        ColorScheme::Heat => {
            if i < 85 {
                Rgb::new(0, clip(3 * i), 255)
            } else if i < 170 {
                Rgb::new(clip(3 * (i - 85)), 0, clip(255 - 3 * (i - 85)))
            } else {
                Rgb::new(255, clip(3 * (i - 170)), 0)
            }
        }
        ColorScheme::Purple => {
            let f = v as f64;
            Rgb::new((f * 0.7) as u8, 0, (f * 1.3).min(255.0) as u8)
        }
        ColorScheme::BlueToBrown => {
            if i > 170 {
                Rgb::new(0, clip(i / 2), v)
            } else if i > 85 {
                Rgb::new(clip(100 - i / 2), clip(100 + i / 3), v)
            } else {
                Rgb::new(clip(140 - i / 2), clip(80 - i / 4), clip(i / 3))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &scheme in ColorScheme::ALL {
            assert_eq!(ColorScheme::from_name(scheme.name()), scheme);
        }
        assert_eq!(ColorScheme::ALL.len(), 8);
    }

    #[test]
    fn unknown_name_is_gray() {
        assert_eq!(ColorScheme::from_name("viridis"), ColorScheme::Gray);
        assert_eq!("".parse::<ColorScheme>().unwrap(), ColorScheme::Gray);
    }

    #[test]
    fn channel_schemes() {
        assert_eq!(evaluate(ColorScheme::Gray, 77), Rgb::new(77, 77, 77));
        assert_eq!(evaluate(ColorScheme::Red, 128), Rgb::new(128, 0, 0));
        assert_eq!(evaluate(ColorScheme::Green, 9), Rgb::new(0, 9, 0));
        assert_eq!(evaluate(ColorScheme::Blue, 55), Rgb::new(200, 200, 55));
    }

    #[test]
    fn water_blue_saturates() {
        assert_eq!(evaluate(ColorScheme::WaterBlue, 0), Rgb::new(255, 255, 0));
        assert_eq!(evaluate(ColorScheme::WaterBlue, 50), Rgb::new(105, 105, 100));
        assert_eq!(evaluate(ColorScheme::WaterBlue, 200), Rgb::new(0, 0, 255));
    }

    #[test]
    fn heat_bands() {
        assert_eq!(evaluate(ColorScheme::Heat, 0), Rgb::new(0, 0, 255));
        assert_eq!(evaluate(ColorScheme::Heat, 84), Rgb::new(0, 252, 255));
        assert_eq!(evaluate(ColorScheme::Heat, 85), Rgb::new(0, 0, 255));
        assert_eq!(evaluate(ColorScheme::Heat, 169), Rgb::new(252, 0, 3));
        assert_eq!(evaluate(ColorScheme::Heat, 170), Rgb::new(255, 0, 0));
        assert_eq!(evaluate(ColorScheme::Heat, 255), Rgb::new(255, 255, 0));
    }

    #[test]
    fn purple_truncates() {
        assert_eq!(evaluate(ColorScheme::Purple, 10), Rgb::new(7, 0, 13));
        assert_eq!(evaluate(ColorScheme::Purple, 255), Rgb::new(178, 0, 255));
    }

    #[test]
    fn blue_to_brown_bands() {
        assert_eq!(evaluate(ColorScheme::BlueToBrown, 0), Rgb::new(140, 80, 0));
        assert_eq!(evaluate(ColorScheme::BlueToBrown, 85), Rgb::new(98, 59, 28));
        assert_eq!(evaluate(ColorScheme::BlueToBrown, 86), Rgb::new(57, 128, 86));
        assert_eq!(evaluate(ColorScheme::BlueToBrown, 170), Rgb::new(15, 156, 170));
        assert_eq!(evaluate(ColorScheme::BlueToBrown, 171), Rgb::new(0, 85, 171));
    }
}
