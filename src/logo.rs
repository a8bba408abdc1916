//! Logo overlay.
//!
//! The logo is composited centred over the finished art. Modules underneath
//! are left in place; the logo simply sits above them, optionally on an
//! opaque plate in the background color.

use core::fmt;
use std::io::Cursor;
use std::sync::Arc;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::datauri;
use crate::error::{ConfigError, LogoError};
use crate::scene::Num;

/// Largest logo accepted by default, in bytes.
pub const DEFAULT_MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// Encoded image bytes (PNG, JPEG, ...). Serialized as a `data:` URI.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogoImage(Arc<[u8]>);

impl LogoImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for LogoImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LogoImage({} bytes)", self.0.len())
    }
}

impl TryFrom<String> for LogoImage {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self::new(datauri::decode(&value)?))
    }
}

impl From<LogoImage> for String {
    fn from(image: LogoImage) -> Self {
        let mime = image::guess_format(image.bytes())
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream");
        datauri::encode(mime, image.bytes())
    }
}

fn default_size_pct() -> f64 {
    20.0
}

fn default_margin_px() -> f64 {
    2.0
}

/// A logo as configured by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSpec {
    pub image: LogoImage,
    /// Side of the logo box as a percentage of the rendered square.
    #[serde(default = "default_size_pct")]
    pub size_pct: f64,
    /// Padding between the logo and the edge of its plate, in pixels.
    #[serde(default = "default_margin_px")]
    pub margin_px: f64,
    /// Draw an opaque plate beneath the logo.
    #[serde(default)]
    pub clear_background: bool,
}

/// A logo that passed validation, normalized to PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLogo {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    pub size_pct: f64,
    pub margin_px: f64,
    pub clear_background: bool,
}

impl PreparedLogo {
    /// Validates and decodes a logo.
    ///
    /// # Errors
    ///
    /// [`LogoError::TooLarge`] when the encoded image exceeds `max_bytes`,
    /// checked before any decoding, and [`LogoError::Decode`] when the bytes
    /// are not a supported image.
    pub fn prepare(spec: &LogoSpec, max_bytes: usize) -> Result<Self, LogoError> {
        let bytes = spec.image.bytes();
        if bytes.len() > max_bytes {
            return Err(LogoError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }
        let decoded = image::load_from_memory(bytes)?;
        let mut png = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            data_uri: datauri::encode("image/png", &png),
            width: decoded.width(),
            height: decoded.height(),
            size_pct: spec.size_pct.clamp(0.0, 100.0),
            margin_px: spec.margin_px.max(0.0),
            clear_background: spec.clear_background,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Square of side `side` centred on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, side: f64) -> Self {
        Self {
            x: cx - side / 2.0,
            y: cy - side / 2.0,
            width: side,
            height: side,
        }
    }
}

/// Where the logo and its plate land over an art square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub logo: Rect,
    pub plate: Option<Rect>,
}

impl LogoPlacement {
    /// Places `logo` over the art square of side `art_px` whose top-left
    /// corner is `(x, y)`.
    pub fn compute(logo: &PreparedLogo, x: f64, y: f64, art_px: f64) -> Self {
        let (cx, cy) = (x + art_px / 2.0, y + art_px / 2.0);
        let side = art_px * logo.size_pct / 100.0;
        Self {
            logo: Rect::centered(cx, cy, side),
            plate: logo
                .clear_background
                .then(|| Rect::centered(cx, cy, side + 2.0 * logo.margin_px)),
        }
    }

    /// Appends the plate and the image.
    pub fn write_svg(&self, out: &mut String, logo: &PreparedLogo, plate_color: Color) {
        if let Some(plate) = self.plate {
            *out += &format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\"/>\n",
                Num(plate.x),
                Num(plate.y),
                Num(plate.width),
                Num(plate.height),
                Num(plate.width * 0.1),
                plate_color
            );
        }
        *out += &format!(
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" href=\"{}\"/>\n",
            Num(self.logo.x),
            Num(self.logo.y),
            Num(self.logo.width),
            Num(self.logo.height),
            logo.data_uri
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    fn spec(bytes: Vec<u8>, size_pct: f64, clear_background: bool) -> LogoSpec {
        LogoSpec {
            image: LogoImage::new(bytes),
            size_pct,
            margin_px: 4.0,
            clear_background,
        }
    }

    #[test]
    fn test_prepare_normalizes_to_png() {
        let logo = PreparedLogo::prepare(&spec(png_bytes(8, 4), 20.0, false), DEFAULT_MAX_LOGO_BYTES).unwrap();
        assert!(logo.data_uri.starts_with("data:image/png;base64,"));
        assert_eq!((logo.width, logo.height), (8, 4));
    }

    #[test]
    fn test_oversized_logo_rejected_before_decoding() {
        let err = PreparedLogo::prepare(&spec(vec![0u8; 64], 20.0, false), 16).unwrap_err();
        assert!(matches!(err, LogoError::TooLarge { size: 64, limit: 16 }));
    }

    #[test]
    fn test_garbage_logo_rejected() {
        let err = PreparedLogo::prepare(&spec(b"not an image".to_vec(), 20.0, false), 1024).unwrap_err();
        assert!(matches!(err, LogoError::Decode(_)));
    }

    #[test]
    fn test_placement_is_centred_with_plate() {
        let logo = PreparedLogo::prepare(&spec(png_bytes(2, 2), 20.0, true), 4096).unwrap();
        let placement = LogoPlacement::compute(&logo, 10.0, 10.0, 300.0);
        assert_eq!(placement.logo, Rect { x: 130.0, y: 130.0, width: 60.0, height: 60.0 });
        assert_eq!(placement.plate, Some(Rect { x: 126.0, y: 126.0, width: 68.0, height: 68.0 }));
    }

    #[test]
    fn test_no_plate_without_clear_background() {
        let logo = PreparedLogo::prepare(&spec(png_bytes(2, 2), 30.0, false), 4096).unwrap();
        let placement = LogoPlacement::compute(&logo, 0.0, 0.0, 200.0);
        assert!(placement.plate.is_none());
        let mut svg = String::new();
        placement.write_svg(&mut svg, &logo, Color::WHITE);
        assert!(svg.starts_with("<image x=\"70\" y=\"70\" width=\"60\""));
    }

    #[test]
    fn test_logo_image_serde_as_data_uri() {
        let image = LogoImage::new(png_bytes(1, 1));
        let json = serde_json::to_string(&image).unwrap();
        assert!(json.starts_with("\"data:image/png;base64,"));
        let back: LogoImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
