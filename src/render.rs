//! Engine selection.
//!
//! Built-in glyphs are drawn by the native engine. As soon as any catalog
//! glyph is selected, the whole symbol goes through the custom renderer,
//! which places one transformed glyph per module.

use std::borrow::Cow;

use crate::body::PatternRenderer;
use crate::catalog::Glyph;
use crate::color::GradientUnits;
use crate::eye::EyeRenderer;
use crate::matrix::ModuleMatrix;
use crate::native;
use crate::scene::Scene;
use crate::style::ResolvedStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Native,
    Custom,
}

impl Engine {
    pub fn select(style: &ResolvedStyle) -> Self {
        if style.has_custom_glyph() {
            Engine::Custom
        } else {
            Engine::Native
        }
    }
}

/// Renders `matrix` in `style`. Pure: equal inputs give equal scenes.
pub fn render_scene(matrix: &ModuleMatrix, style: &ResolvedStyle) -> Scene {
    let engine = Engine::select(style);
    log::debug!("rendering {0}x{0} symbol with the {1:?} engine", matrix.size(), engine);
    match (engine, &style.body) {
        (Engine::Native, Glyph::Builtin(kind)) => native::render(matrix, *kind, style),
        _ => render_custom(matrix, style),
    }
}

fn render_custom(matrix: &ModuleMatrix, style: &ResolvedStyle) -> Scene {
    let pattern = match &style.body {
        Glyph::Builtin(kind) => Cow::Owned(kind.definition()),
        Glyph::Custom(def) => Cow::Borrowed(def),
    };
    let size = matrix.size();
    Scene {
        size,
        background: style.background(),
        gradient: style.colors.gradient(GradientUnits::BoundingBox),
        body: PatternRenderer::new(&pattern, style.colors.body_fill()).render(matrix),
        eyes: EyeRenderer::new(&style.outer, &style.inner, style.outer_color, style.inner_color).render(size),
    }
}
