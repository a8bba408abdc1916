//! The native styling engine.
//!
//! Used whenever only built-in glyphs are selected. The body is written as a
//! single merged path in module coordinates and the gradient spans the whole
//! symbol. This is the only renderer whose output is exported as a true SVG
//! file.

use crate::catalog::BodyKind;
use crate::color::{Fill, GradientUnits};
use crate::eye::EyeRenderer;
use crate::matrix::ModuleMatrix;
use crate::scene::{Body, Scene};
use crate::style::ResolvedStyle;

/// Merges the body modules of `matrix` into one path, one sub-path per
/// module.
pub fn merged_body(matrix: &ModuleMatrix, kind: BodyKind, fill: Fill) -> Body {
    let mut path = String::new();
    let mut modules = 0;
    for (row, col) in matrix.body_cells() {
        if modules != 0 {
            path += " ";
        }
        path += &kind.outline(col as f64, row as f64, 1.0);
        modules += 1;
    }
    Body::Merged { path, modules, fill }
}

/// Renders `matrix` with the built-in body `kind` and the style's built-in
/// or catalog eyes.
pub fn render(matrix: &ModuleMatrix, kind: BodyKind, style: &ResolvedStyle) -> Scene {
    let size = matrix.size();
    let eyes = EyeRenderer::new(&style.outer, &style.inner, style.outer_color, style.inner_color).render(size);
    Scene {
        size,
        background: style.background(),
        gradient: style.colors.gradient(GradientUnits::Symbol(size as f64)),
        body: merged_body(matrix, kind, style.colors.body_fill()),
        eyes,
    }
}

/// Returns a string of SVG code for the scene, `pixel_size` pixels square.
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Example
///
/// ```
/// use qrstyle::catalog::{BodyKind, PatternCatalog};
/// use qrstyle::matrix::{EcLevel, MatrixSource, QrEncoder};
/// use qrstyle::native;
/// use qrstyle::style::{ResolvedStyle, StyleConfig};
///
/// let matrix = QrEncoder.encode("Hello, World!", EcLevel::M).unwrap();
/// let style = ResolvedStyle::resolve(&StyleConfig::default(), &PatternCatalog::builtin(), 1 << 20);
/// let scene = native::render(&matrix, BodyKind::Square, &style);
/// let svg = native::to_svg_string(&scene, 512);
/// assert!(svg.contains("width=\"512\""));
/// ```
pub fn to_svg_string(scene: &Scene, pixel_size: u32) -> String {
    scene.to_svg_document(pixel_size, true)
}
