//! Glyph catalogs.
//!
//! Body modules and the two layers of each finder pattern are drawn with
//! glyphs. A glyph is either one of the built-in parametric shapes or a
//! [`PatternDefinition`] taken from a [`PatternCatalog`]. Ids are resolved once,
//! when a style is resolved, into a [`Glyph`] value; renderers never look ids
//! up again.

use core::fmt;
use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::{rounded_rect, Num};

/// The coordinate box a glyph path is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// `0 0 side side`
    pub const fn square(side: f64) -> Self {
        Self::new(0.0, 0.0, side, side)
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            Num(self.min_x),
            Num(self.min_y),
            Num(self.width),
            Num(self.height)
        )
    }
}

impl FromStr for ViewBox {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::UnknownVariant {
            kind: "viewBox",
            value: s.to_string(),
        };
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            &[min_x, min_y, width, height] if width > 0.0 && height > 0.0 => {
                Ok(Self::new(min_x, min_y, width, height))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ViewBox {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewBox> for String {
    fn from(vb: ViewBox) -> Self {
        vb.to_string()
    }
}

/// A glyph drawn from SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub id: Cow<'static, str>,
    #[serde(default)]
    pub label: Cow<'static, str>,
    pub view_box: ViewBox,
    /// SVG path data (`d` attribute) in view box coordinates.
    pub path: Cow<'static, str>,
    /// Draw the path as an outline instead of filling it.
    #[serde(default)]
    pub is_stroke: bool,
    /// Outline width in view box units.
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

impl PatternDefinition {
    pub const fn filled(id: &'static str, label: &'static str, view_box: ViewBox, path: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            view_box,
            path: Cow::Borrowed(path),
            is_stroke: false,
            stroke_width: None,
        }
    }

    pub const fn stroked(
        id: &'static str,
        label: &'static str,
        view_box: ViewBox,
        path: &'static str,
        stroke_width: f64,
    ) -> Self {
        Self {
            id: Cow::Borrowed(id),
            label: Cow::Borrowed(label),
            view_box,
            path: Cow::Borrowed(path),
            is_stroke: true,
            stroke_width: Some(stroke_width),
        }
    }
}

const UNIT: ViewBox = ViewBox::square(100.0);
const EYE: ViewBox = ViewBox::square(33.0);

/// Body glyphs. All are drawn in a `0 0 100 100` box.
pub static BODY_PATTERNS: [PatternDefinition; 10] = [
    PatternDefinition::filled("pattern-squares", "Squares", UNIT, "M0 0h100v100H0z"),
    PatternDefinition::filled("pattern-dots", "Dots", UNIT, "M50 5a45 45 0 1 1 0 90 45 45 0 0 1 0-90z"),
    PatternDefinition::filled(
        "pattern-rounded",
        "Rounded",
        UNIT,
        "M20 0h60a20 20 0 0 1 20 20v60a20 20 0 0 1-20 20H20a20 20 0 0 1-20-20V20a20 20 0 0 1 20-20z",
    ),
    PatternDefinition::filled(
        "pattern-extra-rounded",
        "Extra Rounded",
        UNIT,
        "M40 0h20a40 40 0 0 1 40 40v20a40 40 0 0 1-40 40H40a40 40 0 0 1-40-40V40a40 40 0 0 1 40-40z",
    ),
    PatternDefinition::filled("pattern-classy", "Classy", UNIT, "M50 0h50v50a50 50 0 0 1-50 50h-50v-50a50 50 0 0 1 50-50z"),
    PatternDefinition::filled("pattern-classy-2", "Classy Inverted", UNIT, "M50 0a50 50 0 0 1 50 50v50h-50a50 50 0 0 1-50-50v-50h50z"),
    PatternDefinition::filled("pattern-diamond", "Diamond", UNIT, "M50 0l50 50-50 50-50-50z"),
    PatternDefinition::filled("pattern-cross", "Cross", UNIT, "M35 0h30v35h35v30h-35v35h-30v-35h-35v-30h35z"),
    PatternDefinition::filled("pattern-star", "Star", UNIT, "M50 0l15 35 35 15-35 15-15 35-15-35-35-15 35-15z"),
    PatternDefinition::filled(
        "pattern-mosaic",
        "Mosaic",
        UNIT,
        "M5 5h40v40h-40zM55 5h40v40h-40zM5 55h40v40h-40zM55 55h40v40h-40z",
    ),
];

/// Outer frames of the finder patterns.
pub static CORNER_SQUARE_PATTERNS: [PatternDefinition; 5] = [
    PatternDefinition::stroked("square-thick", "Square Thick", EYE, "M3 3h27v27H3z", 5.0),
    PatternDefinition::stroked(
        "corner-check",
        "CheckBox",
        ViewBox::square(35.0),
        "M31.016 25.686a6 6 0 0 1-6 6H8.551a6 6 0 0 1-6-6V3.265h22.465a6 6 0 0 1 6 6v16.421Z",
        5.0,
    ),
    PatternDefinition::stroked(
        "corner-cut",
        "Corner Cut",
        ViewBox::new(0.0, 0.0, 37.0, 36.0),
        "M3.318 2.494H23.87c5.523 0 10 4.478 10 10v20.553H13.318c-5.523 0-10-4.477-10-10V2.494Z",
        5.0,
    ),
    PatternDefinition::stroked(
        "corner-flower",
        "Flower",
        ViewBox::square(35.0),
        "M3.431 17.524c0-7.848 6.374-14.21 14.222-14.21 7.86 0 14.244 6.372 14.244 14.233v14.188H17.642c-7.848 0-14.21-6.362-14.21-14.21Z",
        5.0,
    ),
    PatternDefinition::filled(
        "corner-diamond",
        "Diamond",
        ViewBox::new(0.0, 0.0, 32.0, 34.0),
        "M14.018 1.107a3.21 3.21 0 0 1 3.96 0l1.35 1.057L21 1.797a3.209 3.209 0 0 1 3.569 1.718l.756 1.538 1.668.395a3.21 3.21 0 0 1 2.469 3.097l.014 1.714 1.331 1.08a3.209 3.209 0 0 1 .882 3.86l-.731 1.55.73 1.551a3.209 3.209 0 0 1-.88 3.861l-1.332 1.08-.014 1.714a3.21 3.21 0 0 1-2.47 3.096l-1.667.395-.756 1.538A3.209 3.209 0 0 1 21 31.704l-1.674-.368-1.349 1.058a3.21 3.21 0 0 1-3.96 0l-1.349-1.058-1.674.368a3.209 3.209 0 0 1-3.568-1.718l-.757-1.539-1.667-.395a3.21 3.21 0 0 1-2.47-3.096L2.52 23.24l-1.331-1.08a3.21 3.21 0 0 1-.881-3.86l.73-1.551-.73-1.55a3.21 3.21 0 0 1 .881-3.862l1.331-1.08.014-1.713a3.209 3.209 0 0 1 2.47-3.097l1.667-.395.757-1.538a3.209 3.209 0 0 1 3.568-1.718l1.674.367 1.349-1.057Zm1.98 3.634-1.134.89a3.209 3.209 0 0 1-2.669.608l-1.407-.309-.636 1.294a3.209 3.209 0 0 1-2.14 1.706l-1.403.332-.011 1.442A3.209 3.209 0 0 1 5.41 13.17l-1.12.908.615 1.303c.409.867.409 1.87 0 2.738l-.615 1.303 1.12.908a3.209 3.209 0 0 1 1.188 2.466l.011 1.441 1.403.332c.932.221 1.717.847 2.14 1.707l.636 1.293 1.407-.309a3.209 3.209 0 0 1 2.67.61l1.133.889 1.134-.89a3.209 3.209 0 0 1 2.669-.609l1.408.31.636-1.294a3.209 3.209 0 0 1 2.14-1.707l1.402-.332.012-1.441a3.209 3.209 0 0 1 1.188-2.466l1.119-.908-.615-1.303a3.209 3.209 0 0 1 0-2.738l.615-1.303-1.12-.908a3.209 3.209 0 0 1-1.187-2.466l-.012-1.442-1.402-.332a3.209 3.209 0 0 1-2.14-1.706l-.636-1.294-1.408.31a3.21 3.21 0 0 1-2.669-.61l-1.134-.889Z",
    ),
];

/// Inner dots of the finder patterns.
pub static CORNER_DOT_PATTERNS: [PatternDefinition; 11] = [
    PatternDefinition::filled("dot-square", "Square", EYE, "M11 11h11v11H11z"),
    PatternDefinition::filled(
        "dot-rounded",
        "Rounded",
        EYE,
        "M14.158 11.209h5a3 3 0 0 1 3 3v5a3 3 0 0 1-3 3h-5a3 3 0 0 1-3-3v-5a3 3 0 0 1 3-3z",
    ),
    PatternDefinition::filled(
        "dot-circle",
        "Circle",
        EYE,
        "M16.5 11c3.038 0 5.5 2.462 5.5 5.5s-2.462 5.5-5.5 5.5-5.5-2.462-5.5-5.5 2.462-5.5 5.5-5.5z",
    ),
    PatternDefinition::filled("dot-rhombus", "Rhombus", EYE, "M10.568 13.84a3 3 0 0 1 3-3h5a3 3 0 0 1 3 3v8h-8a3 3 0 0 1-3-3v-5Z"),
    PatternDefinition::filled("dot-rounded-in", "Rounded In", EYE, "M11.318 10.84h8a3 3 0 0 1 3 3v5a3 3 0 0 1-3 3h-5a3 3 0 0 1-3-3v-8Z"),
    PatternDefinition::filled("dot-rounded-out", "Rounded Out", EYE, "M10.693 10.84h8a3 3 0 0 1 3 3v8h-8a3 3 0 0 1-3-3v-8Z"),
    PatternDefinition::filled("dot-rounded-corner", "Rounded Corner", EYE, "M21.692 10.84h-8a3 3 0 0 0-3 3v8h8a3 3 0 0 0 3-3v-8Z"),
    PatternDefinition::filled("dot-diamond-sharp", "Diamond Sharp", EYE, "m8 16.34 7.778-7.778 7.779 7.778-7.779 7.778z"),
    PatternDefinition::filled(
        "dot-star",
        "Star",
        EYE,
        "M15.444 9.895a2.2 2.2 0 0 1 3.112 0l4.666 4.667a2.2 2.2 0 0 1 0 3.112l-4.666 4.666a2.2 2.2 0 0 1-3.112 0l-4.667-4.666a2.2 2.2 0 0 1 0-3.112l4.667-4.667Z",
    ),
    PatternDefinition::filled(
        "dot-flower",
        "Flower",
        EYE,
        "M16 10.67a.757.757 0 0 1 1.25 0L19 13.3c.101.15.257.26.437.305l3.133.794c.524.133.73.743.387 1.147l-2.052 2.42a.7.7 0 0 0-.166.494l.185 3.121c.031.521-.507.899-1.01.709l-3.02-1.135a.768.768 0 0 0-.539 0l-3.018 1.135c-.504.19-1.042-.188-1.011-.709l.185-3.12a.7.7 0 0 0-.166-.496l-2.052-2.419c-.342-.404-.137-1.014.387-1.147l3.133-.794a.742.742 0 0 0 .436-.306L16 10.67Z",
    ),
    PatternDefinition::filled(
        "dot-leaf",
        "Leaf",
        EYE,
        "M15.735 10.478a.618.618 0 0 1 .78 0l.755.614a.618.618 0 0 0 .487.13l.96-.153a.618.618 0 0 1 .676.39l.347.909a.617.617 0 0 0 .357.357l.91.346a.618.618 0 0 1 .389.676l-.154.96a.618.618 0 0 0 .13.488l.614.755a.618.618 0 0 1 0 .78l-.614.754a.618.618 0 0 0-.13.488l.154.96a.618.618 0 0 1-.39.676l-.909.347a.618.618 0 0 0-.357.357l-.347.909a.618.618 0 0 1-.675.39l-.96-.155a.618.618 0 0 0-.488.131l-.755.614a.618.618 0 0 1-.78 0l-.755-.614a.618.618 0 0 0-.488-.13l-.96.154a.618.618 0 0 1-.675-.39l-.347-.91a.618.618 0 0 0-.357-.356l-.91-.347a.618.618 0 0 1-.39-.675l.155-.96a.618.618 0 0 0-.13-.489l-.615-.754a.618.618 0 0 1 0-.78l.614-.755a.618.618 0 0 0 .131-.488l-.154-.96a.618.618 0 0 1 .39-.676l.909-.346a.618.618 0 0 0 .357-.357l.347-.91a.618.618 0 0 1 .675-.39l.96.155a.618.618 0 0 0 .488-.13l.755-.615Z",
    ),
];

/// A shape family the renderer knows how to draw without path data.
pub trait BuiltinKind: Copy + fmt::Debug {
    /// Selected when an id matches neither a catalog entry nor a built-in.
    const FALLBACK: Self;
    /// What the kind decorates, for log messages.
    const ROLE: &'static str;

    fn from_id(id: &str) -> Option<Self>;
    fn id(self) -> &'static str;
}

/// Built-in body module shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Square,
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
}

impl BodyKind {
    /// Path data for a module whose box starts at `(x, y)` with side `s`.
    pub fn outline(self, x: f64, y: f64, s: f64) -> String {
        match self {
            BodyKind::Square => rounded_rect(x, y, s, s, 0.0),
            BodyKind::Dots => {
                let r = s / 2.0;
                format!(
                    "M{},{}a{},{} 0 1 1 0,{}a{},{} 0 1 1 0,{}z",
                    Num(x + r),
                    Num(y),
                    Num(r),
                    Num(r),
                    Num(s),
                    Num(r),
                    Num(r),
                    Num(-s)
                )
            }
            BodyKind::Rounded => rounded_rect(x, y, s, s, s * 0.25),
            BodyKind::ExtraRounded => rounded_rect(x, y, s, s, s * 0.4),
            BodyKind::Classy => {
                let h = s / 2.0;
                format!(
                    "M{},{}h{}a{},{} 0 0 1 {},{}v{}h{}a{},{} 0 0 1 {},{}z",
                    Num(x),
                    Num(y),
                    Num(h),
                    Num(h),
                    Num(h),
                    Num(h),
                    Num(h),
                    Num(h),
                    Num(-h),
                    Num(h),
                    Num(h),
                    Num(-h),
                    Num(-h)
                )
            }
        }
    }

    /// The same shape as a `0 0 100 100` glyph.
    pub fn definition(self) -> PatternDefinition {
        PatternDefinition {
            id: Cow::Borrowed(self.id()),
            label: Cow::Borrowed(self.id()),
            view_box: UNIT,
            path: Cow::Owned(self.outline(0.0, 0.0, 100.0)),
            is_stroke: false,
            stroke_width: None,
        }
    }
}

impl BuiltinKind for BodyKind {
    const FALLBACK: Self = BodyKind::Square;
    const ROLE: &'static str = "body";

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "square" => Some(BodyKind::Square),
            "dots" => Some(BodyKind::Dots),
            "rounded" => Some(BodyKind::Rounded),
            "extra-rounded" => Some(BodyKind::ExtraRounded),
            "classy" => Some(BodyKind::Classy),
            _ => None,
        }
    }

    fn id(self) -> &'static str {
        match self {
            BodyKind::Square => "square",
            BodyKind::Dots => "dots",
            BodyKind::Rounded => "rounded",
            BodyKind::ExtraRounded => "extra-rounded",
            BodyKind::Classy => "classy",
        }
    }
}

/// Built-in outer frames: a 7x7 ring with a 5x5 cut-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OuterKind {
    Square,
    ExtraRounded,
    Dot,
}

impl OuterKind {
    /// Corner radius of the outer 7x7 edge, in modules.
    pub fn radius(self) -> f64 {
        match self {
            OuterKind::Square => 0.0,
            OuterKind::ExtraRounded => 2.5,
            OuterKind::Dot => 3.5,
        }
    }
}

impl BuiltinKind for OuterKind {
    const FALLBACK: Self = OuterKind::Square;
    const ROLE: &'static str = "corner square";

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "square" => Some(OuterKind::Square),
            "extra-rounded" => Some(OuterKind::ExtraRounded),
            "dot" => Some(OuterKind::Dot),
            _ => None,
        }
    }

    fn id(self) -> &'static str {
        match self {
            OuterKind::Square => "square",
            OuterKind::ExtraRounded => "extra-rounded",
            OuterKind::Dot => "dot",
        }
    }
}

/// Built-in inner dots: a centred 3x3 square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InnerKind {
    Square,
    Dot,
}

impl InnerKind {
    pub fn radius(self) -> f64 {
        match self {
            InnerKind::Square => 0.0,
            InnerKind::Dot => 1.5,
        }
    }
}

impl BuiltinKind for InnerKind {
    const FALLBACK: Self = InnerKind::Square;
    const ROLE: &'static str = "corner dot";

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "square" => Some(InnerKind::Square),
            "dot" => Some(InnerKind::Dot),
            _ => None,
        }
    }

    fn id(self) -> &'static str {
        match self {
            InnerKind::Square => "square",
            InnerKind::Dot => "dot",
        }
    }
}

/// A resolved glyph selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph<K> {
    Builtin(K),
    Custom(PatternDefinition),
}

impl<K> Glyph<K> {
    pub fn is_custom(&self) -> bool {
        matches!(self, Glyph::Custom(_))
    }
}

pub type BodyGlyph = Glyph<BodyKind>;
pub type OuterGlyph = Glyph<OuterKind>;
pub type InnerGlyph = Glyph<InnerKind>;

/// The glyph definitions available to a style.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCatalog {
    body: Vec<PatternDefinition>,
    corner_square: Vec<PatternDefinition>,
    corner_dot: Vec<PatternDefinition>,
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternCatalog {
    /// The stock catalogs.
    pub fn builtin() -> Self {
        Self {
            body: BODY_PATTERNS.to_vec(),
            corner_square: CORNER_SQUARE_PATTERNS.to_vec(),
            corner_dot: CORNER_DOT_PATTERNS.to_vec(),
        }
    }

    /// Adds a body glyph, replacing any entry with the same id.
    pub fn with_body(mut self, def: PatternDefinition) -> Self {
        upsert(&mut self.body, def);
        self
    }

    pub fn with_corner_square(mut self, def: PatternDefinition) -> Self {
        upsert(&mut self.corner_square, def);
        self
    }

    pub fn with_corner_dot(mut self, def: PatternDefinition) -> Self {
        upsert(&mut self.corner_dot, def);
        self
    }

    pub fn body(&self) -> &[PatternDefinition] {
        &self.body
    }

    pub fn corner_squares(&self) -> &[PatternDefinition] {
        &self.corner_square
    }

    pub fn corner_dots(&self) -> &[PatternDefinition] {
        &self.corner_dot
    }

    pub fn resolve_body(&self, id: &str) -> BodyGlyph {
        resolve(&self.body, id)
    }

    pub fn resolve_outer(&self, id: &str) -> OuterGlyph {
        resolve(&self.corner_square, id)
    }

    pub fn resolve_inner(&self, id: &str) -> InnerGlyph {
        resolve(&self.corner_dot, id)
    }
}

fn upsert(list: &mut Vec<PatternDefinition>, def: PatternDefinition) {
    match list.iter_mut().find(|d| d.id == def.id) {
        Some(slot) => *slot = def,
        None => list.push(def),
    }
}

fn resolve<K: BuiltinKind>(list: &[PatternDefinition], id: &str) -> Glyph<K> {
    if let Some(def) = list.iter().find(|d| d.id == id) {
        return Glyph::Custom(def.clone());
    }
    match K::from_id(id) {
        Some(kind) => Glyph::Builtin(kind),
        None => {
            log::warn!(
                "unknown {} glyph {:?}, using built-in {:?}",
                K::ROLE,
                id,
                K::FALLBACK.id()
            );
            Glyph::Builtin(K::FALLBACK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_resolve_to_custom() {
        let catalog = PatternCatalog::builtin();
        match catalog.resolve_outer("square-thick") {
            Glyph::Custom(def) => {
                assert!(def.is_stroke);
                assert_eq!(def.stroke_width, Some(5.0));
                assert_eq!(def.view_box, ViewBox::square(33.0));
            }
            other => panic!("expected custom glyph, got {:?}", other),
        }
        assert!(catalog.resolve_body("pattern-star").is_custom());
        assert!(catalog.resolve_inner("dot-leaf").is_custom());
    }

    #[test]
    fn test_builtin_ids_resolve_to_builtin() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.resolve_body("dots"), Glyph::Builtin(BodyKind::Dots));
        assert_eq!(catalog.resolve_outer("extra-rounded"), Glyph::Builtin(OuterKind::ExtraRounded));
        assert_eq!(catalog.resolve_inner("dot"), Glyph::Builtin(InnerKind::Dot));
    }

    #[test]
    fn test_unknown_ids_fall_back() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.resolve_body("no-such-pattern"), Glyph::Builtin(BodyKind::Square));
        assert_eq!(catalog.resolve_outer("corner-missing"), Glyph::Builtin(OuterKind::Square));
        assert_eq!(catalog.resolve_inner(""), Glyph::Builtin(InnerKind::Square));
    }

    #[test]
    fn test_catalog_extension_replaces_by_id() {
        let def = PatternDefinition::filled("pattern-dots", "Tiny Dots", UNIT, "M50 40a10 10 0 1 1 0 20 10 10 0 0 1 0-20z");
        let catalog = PatternCatalog::builtin().with_body(def.clone());
        assert_eq!(catalog.body().len(), BODY_PATTERNS.len());
        assert_eq!(catalog.resolve_body("pattern-dots"), Glyph::Custom(def));
    }

    #[test]
    fn test_view_box_parsing() {
        let vb: ViewBox = "0 0 37 36".parse().unwrap();
        assert_eq!(vb, ViewBox::new(0.0, 0.0, 37.0, 36.0));
        assert_eq!(vb.to_string(), "0 0 37 36");
        assert!("0 0 0 10".parse::<ViewBox>().is_err());
        assert!("0 0 10".parse::<ViewBox>().is_err());
    }

    #[test]
    fn test_definition_round_trips_through_json() {
        let json = r#"{"id":"mine","view_box":"0 0 50 50","path":"M0 0h50v50H0z"}"#;
        let def: PatternDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.view_box.width, 50.0);
        assert!(!def.is_stroke);
    }

    #[test]
    fn test_builtin_outlines() {
        assert_eq!(BodyKind::Square.outline(3.0, 4.0, 1.0), "M3,4h1v1h-1z");
        assert_eq!(BodyKind::Dots.outline(0.0, 0.0, 1.0), "M0.5,0a0.5,0.5 0 1 1 0,1a0.5,0.5 0 1 1 0,-1z");
        assert_eq!(BodyKind::Square.definition().path, "M0,0h100v100h-100z");
    }
}
