//! Body module rendering.

use crate::catalog::PatternDefinition;
use crate::color::Fill;
use crate::matrix::ModuleMatrix;
use crate::scene::{Body, GlyphInstance, Transform};

/// Maps every dark module outside the finder zones to one glyph instance.
///
/// The glyph's view box is scaled uniformly by `1 / width` and its origin
/// moved onto the module, so a glyph that fills its view box fills the
/// module exactly. Every instance gets the same fill: either the flat color
/// or a reference to the scene's gradient.
///
/// # Example
///
/// ```
/// use qrstyle::body::PatternRenderer;
/// use qrstyle::catalog::BODY_PATTERNS;
/// use qrstyle::color::{Color, Fill};
/// use qrstyle::matrix::{EcLevel, MatrixSource, QrEncoder};
///
/// let matrix = QrEncoder.encode("https://example.com", EcLevel::M).unwrap();
/// let body = PatternRenderer::new(&BODY_PATTERNS[1], Fill::Solid(Color::BLACK)).render(&matrix);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PatternRenderer<'a> {
    pattern: &'a PatternDefinition,
    fill: Fill,
}

impl<'a> PatternRenderer<'a> {
    pub fn new(pattern: &'a PatternDefinition, fill: Fill) -> Self {
        Self { pattern, fill }
    }

    /// Transform placing the glyph on the module at `(row, col)`.
    pub fn transform_for(&self, row: usize, col: usize) -> Transform {
        let vb = &self.pattern.view_box;
        let s = 1.0 / vb.width;
        Transform::new(col as f64 - vb.min_x * s, row as f64 - vb.min_y * s, s, s)
    }

    /// Body glyph instances for `matrix`, in row-major order.
    ///
    /// Body glyphs are always filled; stroke metadata only applies to corner
    /// glyphs.
    pub fn render(&self, matrix: &ModuleMatrix) -> Body {
        let instances = matrix
            .body_cells()
            .map(|(row, col)| GlyphInstance {
                row,
                col,
                transform: self.transform_for(row, col),
                fill: self.fill,
            })
            .collect();
        Body::Glyphs {
            path: self.pattern.path.clone(),
            instances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ViewBox, BODY_PATTERNS};
    use crate::color::Color;
    use crate::matrix::{is_eye_zone, EcLevel, MatrixSource, QrEncoder};

    fn instances(body: &Body) -> &[GlyphInstance] {
        match body {
            Body::Glyphs { instances, .. } => instances,
            Body::Merged { .. } => panic!("expected glyph instances"),
        }
    }

    #[test]
    fn test_emits_one_glyph_per_dark_body_module() {
        let matrix = QrEncoder.encode("https://example.com/some/longer/path?q=1", EcLevel::Q).unwrap();
        let n = matrix.size();
        let mut dark = 0;
        let mut in_eyes = 0;
        for row in 0..n {
            for col in 0..n {
                if matrix.get(col, row) {
                    dark += 1;
                    if is_eye_zone(n, row, col) {
                        in_eyes += 1;
                    }
                }
            }
        }
        let body = PatternRenderer::new(&BODY_PATTERNS[0], Fill::Solid(Color::BLACK)).render(&matrix);
        assert_eq!(instances(&body).len(), dark - in_eyes);
    }

    #[test]
    fn test_fourth_corner_is_rendered() {
        let matrix = ModuleMatrix::from_modules(21, vec![true; 21 * 21], EcLevel::L).unwrap();
        let body = PatternRenderer::new(&BODY_PATTERNS[0], Fill::Gradient).render(&matrix);
        assert!(instances(&body).iter().any(|g| (g.row, g.col) == (20, 20)));
        assert!(!instances(&body).iter().any(|g| (g.row, g.col) == (20, 0)));
        assert!(instances(&body).iter().all(|g| g.fill == Fill::Gradient));
    }

    #[test]
    fn test_scale_is_uniform_for_non_square_view_box() {
        let mut pattern = BODY_PATTERNS[0].clone();
        pattern.view_box = ViewBox::new(0.0, 0.0, 37.0, 36.0);
        let t = PatternRenderer::new(&pattern, Fill::Gradient).transform_for(3, 5);
        assert_eq!(t.sx, t.sy);
        assert_eq!((t.tx, t.ty), (5.0, 3.0));
    }

    #[test]
    fn test_view_box_origin_is_cancelled() {
        let mut pattern = BODY_PATTERNS[0].clone();
        pattern.view_box = ViewBox::new(-50.0, 10.0, 100.0, 100.0);
        let t = PatternRenderer::new(&pattern, Fill::Gradient).transform_for(2, 4);
        assert!((t.tx - 4.5).abs() < 1e-9);
        assert!((t.ty - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let matrix = QrEncoder.encode("idempotent", EcLevel::M).unwrap();
        let renderer = PatternRenderer::new(&BODY_PATTERNS[8], Fill::Solid(Color([10, 20, 30])));
        assert_eq!(renderer.render(&matrix), renderer.render(&matrix));
    }
}
