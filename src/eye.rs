//! Finder pattern rendering.
//!
//! Each of the three finder zones is drawn as two layers: the outer frame
//! (a 7x7 ring) and the inner dot (a centred 3x3 square). Both layers are
//! selected independently, but the same selection and colors apply to all
//! three zones.

use std::borrow::Cow;

use crate::catalog::{Glyph, InnerGlyph, OuterGlyph, PatternDefinition};
use crate::color::{Color, Fill, Paint};
use crate::matrix::{finder_origins, FINDER_SIZE};
use crate::scene::{rounded_rect, EyeGeometry, EyeShape, Transform};

/// Stroke width of outline outer frames that declare none, in view box units.
pub const DEFAULT_OUTER_STROKE: f64 = 5.0;

/// Stroke width of outline inner dots that declare none.
pub const DEFAULT_INNER_STROKE: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct EyeRenderer<'a> {
    outer: &'a OuterGlyph,
    inner: &'a InnerGlyph,
    outer_color: Color,
    inner_color: Color,
}

impl<'a> EyeRenderer<'a> {
    pub fn new(outer: &'a OuterGlyph, inner: &'a InnerGlyph, outer_color: Color, inner_color: Color) -> Self {
        Self {
            outer,
            inner,
            outer_color,
            inner_color,
        }
    }

    /// Geometry for the three finder zones of a `size`-module symbol, in the
    /// order top-left, top-right, bottom-left.
    pub fn render(&self, size: usize) -> Vec<EyeGeometry> {
        let outer = self.outer_shape();
        let inner = self.inner_shape();
        finder_origins(size)
            .into_iter()
            .map(|origin| EyeGeometry {
                origin,
                outer: outer.clone(),
                inner: inner.clone(),
            })
            .collect()
    }

    fn outer_shape(&self) -> EyeShape {
        match self.outer {
            Glyph::Builtin(kind) => {
                let r = kind.radius();
                let side = FINDER_SIZE as f64;
                let ring = rounded_rect(0.0, 0.0, side, side, r) + &rounded_rect(1.0, 1.0, side - 2.0, side - 2.0, (r - 1.0).max(0.0));
                EyeShape {
                    path: Cow::Owned(ring),
                    transform: Transform::IDENTITY,
                    paint: Paint::Fill(Fill::Solid(self.outer_color)),
                    even_odd: true,
                }
            }
            Glyph::Custom(def) => custom_shape(def, self.outer_color, DEFAULT_OUTER_STROKE, !def.is_stroke),
        }
    }

    fn inner_shape(&self) -> EyeShape {
        match self.inner {
            Glyph::Builtin(kind) => EyeShape {
                path: Cow::Owned(rounded_rect(2.0, 2.0, 3.0, 3.0, kind.radius())),
                transform: Transform::IDENTITY,
                paint: Paint::Fill(Fill::Solid(self.inner_color)),
                even_odd: false,
            },
            Glyph::Custom(def) => custom_shape(def, self.inner_color, DEFAULT_INNER_STROKE, false),
        }
    }
}

/// Scales a catalog glyph onto the 7x7 zone. Each axis gets its own factor.
fn custom_shape(def: &PatternDefinition, color: Color, default_stroke: f64, even_odd: bool) -> EyeShape {
    let vb = &def.view_box;
    let side = FINDER_SIZE as f64;
    let (sx, sy) = (side / vb.width, side / vb.height);
    let paint = if def.is_stroke {
        Paint::Stroke {
            color,
            width: def.stroke_width.unwrap_or(default_stroke),
        }
    } else {
        Paint::Fill(Fill::Solid(color))
    };
    EyeShape {
        path: def.path.clone(),
        transform: Transform::new(-vb.min_x * sx, -vb.min_y * sy, sx, sy),
        paint,
        even_odd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InnerKind, OuterKind, PatternCatalog, ViewBox};

    const RED: Color = Color([255, 0, 0]);
    const BLUE: Color = Color([0, 0, 255]);

    #[test]
    fn test_three_zones_share_one_selection() {
        let outer = Glyph::Builtin(OuterKind::ExtraRounded);
        let inner = Glyph::Builtin(InnerKind::Dot);
        let eyes = EyeRenderer::new(&outer, &inner, RED, BLUE).render(25);
        let origins: Vec<_> = eyes.iter().map(|e| e.origin).collect();
        assert_eq!(origins, vec![(0, 0), (18, 0), (0, 18)]);
        assert!(eyes.windows(2).all(|w| w[0].outer == w[1].outer && w[0].inner == w[1].inner));
    }

    #[test]
    fn test_builtin_square_ring() {
        let outer = Glyph::Builtin(OuterKind::Square);
        let inner = Glyph::Builtin(InnerKind::Square);
        let eyes = EyeRenderer::new(&outer, &inner, RED, BLUE).render(21);
        let eye = &eyes[0];
        assert_eq!(eye.outer.path, "M0,0h7v7h-7zM1,1h5v5h-5z");
        assert!(eye.outer.even_odd);
        assert_eq!(eye.outer.paint, Paint::Fill(Fill::Solid(RED)));
        assert_eq!(eye.inner.path, "M2,2h3v3h-3z");
        assert_eq!(eye.inner.paint, Paint::Fill(Fill::Solid(BLUE)));
    }

    #[test]
    fn test_rounded_ring_cut_out_uses_smaller_radius() {
        let outer = Glyph::Builtin(OuterKind::ExtraRounded);
        let inner = Glyph::Builtin(InnerKind::Square);
        let eyes = EyeRenderer::new(&outer, &inner, RED, RED).render(21);
        assert!(eyes[0].outer.path.contains("M2.5,0h2a2.5,2.5"));
        assert!(eyes[0].outer.path.contains("M2.5,1h2a1.5,1.5"));
    }

    #[test]
    fn test_custom_outer_scales_per_axis_and_strokes() {
        let catalog = PatternCatalog::builtin();
        let outer = catalog.resolve_outer("corner-cut");
        let inner = catalog.resolve_inner("dot-circle");
        let eyes = EyeRenderer::new(&outer, &inner, RED, BLUE).render(21);
        let t = eyes[0].outer.transform;
        assert!((t.sx - 7.0 / 37.0).abs() < 1e-12);
        assert!((t.sy - 7.0 / 36.0).abs() < 1e-12);
        assert_eq!(eyes[0].outer.paint, Paint::Stroke { color: RED, width: 5.0 });
        assert_eq!(eyes[0].inner.paint, Paint::Fill(Fill::Solid(BLUE)));
        assert!((eyes[0].inner.transform.sx - 7.0 / 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_stroked_inner_defaults_to_unit_width() {
        let def = PatternDefinition {
            stroke_width: None,
            ..PatternDefinition::stroked("dot-outline", "Outline", ViewBox::square(33.0), "M11 11h11v11H11z", 1.0)
        };
        let outer = Glyph::Builtin(OuterKind::Square);
        let inner = Glyph::Custom(def);
        let eyes = EyeRenderer::new(&outer, &inner, RED, BLUE).render(21);
        assert_eq!(eyes[0].inner.paint, Paint::Stroke { color: BLUE, width: DEFAULT_INNER_STROKE });
    }
}
