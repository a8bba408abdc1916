//! Style configuration.
//!
//! [`StyleConfig`] is the single value describing how a symbol looks. It is
//! never patched in place: every `with_*` call consumes the value and returns
//! a new one, and the session swaps whole values. Everything derived from it
//! (glyph selection, fills, error correction level, export route) is a pure
//! function of the config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{BodyGlyph, InnerGlyph, OuterGlyph, PatternCatalog};
use crate::color::{Color, ColorEngine, ColorMode};
use crate::error::ConfigError;
use crate::logo::{LogoSpec, PreparedLogo};
use crate::matrix::EcLevel;
use crate::payload::ContentKind;

/// Glyph and color of one finder-pattern layer. The same selection applies
/// to all three finder patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerStyle {
    pub glyph: String,
    /// Falls back to the style's flat color when unset.
    pub color: Option<Color>,
}

impl Default for CornerStyle {
    fn default() -> Self {
        Self {
            glyph: "square".to_string(),
            color: None,
        }
    }
}

/// The complete visual configuration of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Built-in kind (`square`, `dots`, ...) or catalog id (`pattern-star`, ...).
    pub body_glyph: String,
    pub color_mode: ColorMode,
    /// Flat module color.
    pub color: Color,
    /// Gradient stops at offsets 0 and 1.
    pub gradient_colors: [Color; 2],
    pub gradient_rotation_deg: f64,
    pub background_color: Color,
    pub background_transparent: bool,
    pub corner_outer: CornerStyle,
    pub corner_inner: CornerStyle,
    pub logo: Option<LogoSpec>,
    /// Used as-is when `manual_level_override` is set.
    pub error_correction_level: EcLevel,
    pub manual_level_override: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            body_glyph: "square".to_string(),
            color_mode: ColorMode::Solid,
            color: Color::BLACK,
            gradient_colors: [Color::BLACK, Color::BLACK],
            gradient_rotation_deg: 0.0,
            background_color: Color::WHITE,
            background_transparent: false,
            corner_outer: CornerStyle::default(),
            corner_inner: CornerStyle::default(),
            logo: None,
            error_correction_level: EcLevel::M,
            manual_level_override: false,
        }
    }
}

impl StyleConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    #[must_use]
    pub fn with_body_glyph(self, id: impl Into<String>) -> Self {
        Self {
            body_glyph: id.into(),
            ..self
        }
    }

    /// Switches to flat coloring.
    #[must_use]
    pub fn with_solid_color(self, color: Color) -> Self {
        Self {
            color_mode: ColorMode::Solid,
            color,
            ..self
        }
    }

    /// Switches to a two-stop gradient. `mode` must not be
    /// [`ColorMode::Solid`]; passing it keeps the current flat color.
    #[must_use]
    pub fn with_gradient(self, mode: ColorMode, stops: [Color; 2], rotation_deg: f64) -> Self {
        Self {
            color_mode: mode,
            gradient_colors: stops,
            gradient_rotation_deg: rotation_deg,
            ..self
        }
    }

    #[must_use]
    pub fn with_background(self, color: Color, transparent: bool) -> Self {
        Self {
            background_color: color,
            background_transparent: transparent,
            ..self
        }
    }

    #[must_use]
    pub fn with_corner_outer(self, glyph: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            corner_outer: CornerStyle {
                glyph: glyph.into(),
                color,
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_corner_inner(self, glyph: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            corner_inner: CornerStyle {
                glyph: glyph.into(),
                color,
            },
            ..self
        }
    }

    #[must_use]
    pub fn with_logo(self, logo: Option<LogoSpec>) -> Self {
        Self { logo, ..self }
    }

    /// `Some(level)` pins the level; `None` returns to automatic selection.
    #[must_use]
    pub fn with_manual_level(self, level: Option<EcLevel>) -> Self {
        match level {
            Some(level) => Self {
                error_correction_level: level,
                manual_level_override: true,
                ..self
            },
            None => Self {
                manual_level_override: false,
                ..self
            },
        }
    }

    /// The error correction level to encode `kind` content at.
    ///
    /// A manual override wins. Otherwise the level starts at M, rises to Q for
    /// a logo wider than 20% and to H above 30%, and never drops below Q for
    /// dense payloads such as contact cards and WiFi credentials.
    pub fn effective_level(&self, kind: ContentKind) -> EcLevel {
        if self.manual_level_override {
            return self.error_correction_level;
        }
        let mut level = EcLevel::M;
        if let Some(logo) = &self.logo {
            if logo.size_pct > 30.0 {
                level = EcLevel::H;
            } else if logo.size_pct > 20.0 {
                level = EcLevel::Q;
            }
        }
        if kind.is_dense() {
            level = level.max(EcLevel::Q);
        }
        level
    }
}

/// A [`StyleConfig`] with every id looked up and the logo validated, ready
/// for the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub body: BodyGlyph,
    pub outer: OuterGlyph,
    pub inner: InnerGlyph,
    pub colors: ColorEngine,
    pub outer_color: Color,
    pub inner_color: Color,
    background: Color,
    background_transparent: bool,
    pub logo: Option<PreparedLogo>,
    /// Problems that were recovered from, for display to the user.
    pub warnings: Vec<String>,
}

impl ResolvedStyle {
    pub fn resolve(style: &StyleConfig, catalog: &PatternCatalog, logo_max_bytes: usize) -> Self {
        let mut warnings = Vec::new();
        let logo = style.logo.as_ref().and_then(|spec| match PreparedLogo::prepare(spec, logo_max_bytes) {
            Ok(logo) => Some(logo),
            Err(e) => {
                log::warn!("logo rejected: {}", e);
                warnings.push(format!("Logo ignored: {}", e));
                None
            }
        });
        Self {
            body: catalog.resolve_body(&style.body_glyph),
            outer: catalog.resolve_outer(&style.corner_outer.glyph),
            inner: catalog.resolve_inner(&style.corner_inner.glyph),
            colors: ColorEngine::new(
                style.color_mode,
                style.color,
                style.gradient_colors,
                style.gradient_rotation_deg,
            ),
            outer_color: style.corner_outer.color.unwrap_or(style.color),
            inner_color: style.corner_inner.color.unwrap_or(style.color),
            background: style.background_color,
            background_transparent: style.background_transparent,
            logo,
            warnings,
        }
    }

    /// True when any glyph comes from a catalog rather than the built-in set.
    pub fn has_custom_glyph(&self) -> bool {
        self.body.is_custom() || self.outer.is_custom() || self.inner.is_custom()
    }

    /// Background fill, or `None` when transparent.
    pub fn background(&self) -> Option<Color> {
        (!self.background_transparent).then_some(self.background)
    }

    /// Color used behind a logo: the background, or white over transparency.
    pub fn plate_color(&self) -> Color {
        self.background().unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BodyKind, Glyph};
    use crate::logo::LogoImage;

    fn logo(size_pct: f64) -> LogoSpec {
        LogoSpec {
            image: LogoImage::new(vec![0u8; 4]),
            size_pct,
            margin_px: 2.0,
            clear_background: false,
        }
    }

    #[test]
    fn test_large_logo_escalates_to_h() {
        let style = StyleConfig::default().with_logo(Some(logo(35.0)));
        assert_eq!(style.effective_level(ContentKind::Text), EcLevel::H);
    }

    #[test]
    fn test_medium_logo_escalates_to_q() {
        let style = StyleConfig::default().with_logo(Some(logo(25.0)));
        assert_eq!(style.effective_level(ContentKind::Url), EcLevel::Q);
        let edge = StyleConfig::default().with_logo(Some(logo(30.0)));
        assert_eq!(edge.effective_level(ContentKind::Url), EcLevel::Q);
    }

    #[test]
    fn test_small_logo_stays_at_m() {
        let style = StyleConfig::default().with_logo(Some(logo(15.0)));
        assert_eq!(style.effective_level(ContentKind::Text), EcLevel::M);
    }

    #[test]
    fn test_dense_content_floors_at_q() {
        let style = StyleConfig::default().with_logo(Some(logo(15.0)));
        assert!(style.effective_level(ContentKind::Wifi) >= EcLevel::Q);
        assert_eq!(StyleConfig::default().effective_level(ContentKind::VCard), EcLevel::Q);
        let big = StyleConfig::default().with_logo(Some(logo(40.0)));
        assert_eq!(big.effective_level(ContentKind::Wifi), EcLevel::H);
    }

    #[test]
    fn test_manual_override_wins() {
        let style = StyleConfig::default()
            .with_logo(Some(logo(40.0)))
            .with_manual_level(Some(EcLevel::L));
        assert_eq!(style.effective_level(ContentKind::Wifi), EcLevel::L);
        let auto = style.with_manual_level(None);
        assert_eq!(auto.effective_level(ContentKind::Text), EcLevel::H);
    }

    #[test]
    fn test_updates_produce_new_values() {
        let base = StyleConfig::default();
        let dotted = base.clone().with_body_glyph("dots");
        assert_eq!(base.body_glyph, "square");
        assert_eq!(dotted.body_glyph, "dots");
        assert_ne!(base, dotted);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let style = StyleConfig::from_json(
            r##"{"body_glyph":"pattern-dots","color":"#112233","corner_outer":{"glyph":"square-thick"}}"##,
        )
        .unwrap();
        assert_eq!(style.color, Color([0x11, 0x22, 0x33]));
        assert_eq!(style.corner_inner.glyph, "square");
        assert_eq!(style.background_color, Color::WHITE);
        assert!(style.logo.is_none());
    }

    #[test]
    fn test_resolve_detects_custom_glyphs() {
        let catalog = PatternCatalog::builtin();
        let plain = ResolvedStyle::resolve(&StyleConfig::default(), &catalog, 1024);
        assert!(!plain.has_custom_glyph());
        assert_eq!(plain.body, Glyph::Builtin(BodyKind::Square));

        let custom = StyleConfig::default().with_corner_inner("dot-star", None);
        assert!(ResolvedStyle::resolve(&custom, &catalog, 1024).has_custom_glyph());
    }

    #[test]
    fn test_corner_colors_default_to_flat_color() {
        let red = Color([255, 0, 0]);
        let blue = Color([0, 0, 255]);
        let style = StyleConfig::default()
            .with_solid_color(red)
            .with_corner_inner("square", Some(blue));
        let resolved = ResolvedStyle::resolve(&style, &PatternCatalog::builtin(), 1024);
        assert_eq!(resolved.outer_color, red);
        assert_eq!(resolved.inner_color, blue);
    }

    #[test]
    fn test_unreadable_logo_is_dropped_with_warning() {
        let style = StyleConfig::default().with_logo(Some(logo(20.0)));
        let resolved = ResolvedStyle::resolve(&style, &PatternCatalog::builtin(), 1024);
        assert!(resolved.logo.is_none());
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn test_transparent_background() {
        let style = StyleConfig::default().with_background(Color([1, 2, 3]), true);
        let resolved = ResolvedStyle::resolve(&style, &PatternCatalog::builtin(), 1024);
        assert_eq!(resolved.background(), None);
        assert_eq!(resolved.plate_color(), Color::WHITE);
    }
}
