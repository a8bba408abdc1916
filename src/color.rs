//! Colors, gradients and fill resolution.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Id of the one gradient resource a scene may define.
pub const GRADIENT_ID: &str = "qr-gradient";

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgb[i] = v * 17;
                }
                Ok(Color(rgb))
            }
            6 => Ok(Color([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// How body modules are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Solid,
    Linear,
    Radial,
}

/// Coordinate space a gradient is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientUnits {
    /// Each painted glyph's own bounding box, `0..1` on both axes.
    BoundingBox,
    /// The whole symbol, `0..size` modules on both axes.
    Symbol(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    Linear { rotation_deg: f64 },
    Radial,
}

/// A two-stop gradient. Stops sit at offsets 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDef {
    pub shape: GradientShape,
    pub stops: [Color; 2],
    pub units: GradientUnits,
}

/// A point in gradient space.
pub type Point = (f64, f64);

impl GradientDef {
    /// Start and end of a linear gradient's axis in its own units, or `None`
    /// for radial gradients.
    ///
    /// In bounding-box units the unrotated axis runs corner to corner,
    /// `(0,0) -> (1,1)`, and rotation turns it about the box centre. In symbol
    /// units the axis runs left to right across the symbol and the rotation
    /// is applied in radians.
    pub fn axis(&self) -> Option<(Point, Point)> {
        let GradientShape::Linear { rotation_deg } = self.shape else {
            return None;
        };
        let theta = rotation_deg.to_radians();
        Some(match self.units {
            GradientUnits::BoundingBox => {
                let rotate = |(x, y): Point| {
                    let (dx, dy) = (x - 0.5, y - 0.5);
                    (
                        0.5 + dx * theta.cos() - dy * theta.sin(),
                        0.5 + dx * theta.sin() + dy * theta.cos(),
                    )
                };
                (rotate((0.0, 0.0)), rotate((1.0, 1.0)))
            }
            GradientUnits::Symbol(size) => {
                let c = size / 2.0;
                let (dx, dy) = (c * theta.cos(), c * theta.sin());
                ((c - dx, c - dy), (c + dx, c + dy))
            }
        })
    }
}

/// Fill of a single element: a flat color or the scene's shared gradient.
/// An element never carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Solid(Color),
    Gradient,
}

/// How a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Fill),
    Stroke { color: Color, width: f64 },
}

/// Resolves fills for body modules from the style's color settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEngine {
    mode: ColorMode,
    color: Color,
    stops: [Color; 2],
    rotation_deg: f64,
}

impl ColorEngine {
    pub fn new(mode: ColorMode, color: Color, stops: [Color; 2], rotation_deg: f64) -> Self {
        Self {
            mode,
            color,
            stops,
            rotation_deg,
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// The flat color, also the default for eyes without an explicit color.
    pub fn solid(&self) -> Color {
        self.color
    }

    /// Fill for body modules.
    pub fn body_fill(&self) -> Fill {
        match self.mode {
            ColorMode::Solid => Fill::Solid(self.color),
            ColorMode::Linear | ColorMode::Radial => Fill::Gradient,
        }
    }

    /// The shared gradient resource, if the mode needs one. Radial gradients
    /// ignore rotation.
    pub fn gradient(&self, units: GradientUnits) -> Option<GradientDef> {
        let shape = match self.mode {
            ColorMode::Solid => return None,
            ColorMode::Linear => GradientShape::Linear {
                rotation_deg: self.rotation_deg,
            },
            ColorMode::Radial => GradientShape::Radial,
        };
        Some(GradientDef {
            shape,
            stops: self.stops,
            units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    fn linear(rotation_deg: f64, units: GradientUnits) -> GradientDef {
        let engine = ColorEngine::new(
            ColorMode::Linear,
            Color::BLACK,
            ["#ff0000".parse().unwrap(), "#0000ff".parse().unwrap()],
            rotation_deg,
        );
        engine.gradient(units).unwrap()
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#FF8000".parse::<Color>().unwrap(), Color([255, 128, 0]));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert!("ff8000".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert_eq!(Color([1, 2, 3]).to_hex(), "#010203");
    }

    #[test]
    fn test_color_serde_as_hex_string() {
        let json = serde_json::to_string(&Color([255, 0, 16])).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color([255, 0, 16]));
    }

    #[test]
    fn test_half_turn_mirrors_the_axis() {
        for units in [GradientUnits::BoundingBox, GradientUnits::Symbol(25.0)] {
            let a = linear(0.0, units);
            let b = linear(180.0, units);
            let (a0, a1) = a.axis().unwrap();
            let (b0, b1) = b.axis().unwrap();
            assert!(close(a0, b1), "{:?}", units);
            assert!(close(a1, b0), "{:?}", units);
            assert_eq!(a.stops, b.stops);
        }
    }

    #[test]
    fn test_radial_ignores_rotation() {
        let engine = ColorEngine::new(ColorMode::Radial, Color::BLACK, [Color::BLACK, Color::WHITE], 45.0);
        let g = engine.gradient(GradientUnits::BoundingBox).unwrap();
        assert_eq!(g.shape, GradientShape::Radial);
        assert_eq!(g.axis(), None);
    }

    #[test]
    fn test_switching_modes_replaces_fill() {
        let stops = [Color::BLACK, Color::WHITE];
        let solid = ColorEngine::new(ColorMode::Solid, Color([9, 9, 9]), stops, 0.0);
        assert_eq!(solid.body_fill(), Fill::Solid(Color([9, 9, 9])));
        assert!(solid.gradient(GradientUnits::BoundingBox).is_none());

        let linear = ColorEngine::new(ColorMode::Linear, Color([9, 9, 9]), stops, 0.0);
        assert_eq!(linear.body_fill(), Fill::Gradient);
        assert!(linear.gradient(GradientUnits::BoundingBox).is_some());
    }
}
