//! Vector geometry of a rendered symbol and its SVG serialization.
//!
//! A [`Scene`] is laid out in module units: the symbol occupies
//! `0..size` on both axes. It can be written as a standalone SVG document at
//! any pixel size, or nested into a larger composition.

use core::fmt;
use std::borrow::Cow;

use crate::color::{Color, Fill, GradientDef, GradientShape, GradientUnits, Paint, GRADIENT_ID};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Compact number formatting for SVG attributes: integers print without a
/// fraction, everything else with at most four decimals.
#[derive(Debug, Clone, Copy)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.0;
        if v == v.trunc() && v.abs() < 1e15 {
            return write!(f, "{}", v as i64);
        }
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(if s == "-0" { "0" } else { s })
    }
}

/// Path data for a `w` by `h` rectangle at `(x, y)` with corner radius `r`.
/// The radius is clamped to half the shorter side, so `r >= side / 2` gives
/// a circle or stadium.
pub fn rounded_rect(x: f64, y: f64, w: f64, h: f64, r: f64) -> String {
    let r = r.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return format!("M{},{}h{}v{}h{}z", Num(x), Num(y), Num(w), Num(h), Num(-w));
    }
    let (iw, ih) = (w - 2.0 * r, h - 2.0 * r);
    let (p, n) = (Num(r), Num(-r));
    format!(
        "M{},{}h{}a{p},{p} 0 0 1 {p},{p}v{}a{p},{p} 0 0 1 {n},{p}h{}a{p},{p} 0 0 1 {n},{n}v{}a{p},{p} 0 0 1 {p},{n}z",
        Num(x + r),
        Num(y),
        Num(iw),
        Num(ih),
        Num(-iw),
        Num(-ih),
    )
}

/// Escapes text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Translation followed by a scale, the only transform glyphs need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub tx: f64,
    pub ty: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        tx: 0.0,
        ty: 0.0,
        sx: 1.0,
        sy: 1.0,
    };

    pub fn new(tx: f64, ty: f64, sx: f64, sy: f64) -> Self {
        Self { tx, ty, sx, sy }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "translate({} {})", Num(self.tx), Num(self.ty))?;
        if self.sx == self.sy {
            write!(f, " scale({})", Num(self.sx))
        } else {
            write!(f, " scale({} {})", Num(self.sx), Num(self.sy))
        }
    }
}

/// One body glyph placed on a module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInstance {
    pub row: usize,
    pub col: usize,
    pub transform: Transform,
    pub fill: Fill,
}

/// Body modules of a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// One transformed copy of a glyph path per dark module.
    Glyphs {
        path: Cow<'static, str>,
        instances: Vec<GlyphInstance>,
    },
    /// All modules merged into one path in module coordinates.
    Merged { path: String, modules: usize, fill: Fill },
}

/// A single finder-pattern layer, in coordinates relative to its zone.
#[derive(Debug, Clone, PartialEq)]
pub struct EyeShape {
    pub path: Cow<'static, str>,
    pub transform: Transform,
    pub paint: Paint,
    pub even_odd: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EyeGeometry {
    /// Top-left module `(x, y)` of the zone.
    pub origin: (usize, usize),
    pub outer: EyeShape,
    pub inner: EyeShape,
}

/// The complete vector art of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: usize,
    pub background: Option<Color>,
    pub gradient: Option<GradientDef>,
    pub body: Body,
    pub eyes: Vec<EyeGeometry>,
}

impl Scene {
    /// Number of body modules drawn.
    pub fn glyph_count(&self) -> usize {
        match &self.body {
            Body::Glyphs { instances, .. } => instances.len(),
            Body::Merged { modules, .. } => *modules,
        }
    }

    /// Returns a standalone SVG document `pixel_size` pixels square.
    ///
    /// With `prolog` the document starts with the XML declaration and the
    /// SVG 1.1 DOCTYPE, as files on disk should.
    pub fn to_svg_document(&self, pixel_size: u32, prolog: bool) -> String {
        let mut result = String::new();
        if prolog {
            result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
            result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
        }
        result += &format!(
            "<svg xmlns=\"{}\" version=\"1.1\" width=\"{1}\" height=\"{1}\" viewBox=\"0 0 {2} {2}\">\n",
            SVG_NS, pixel_size, self.size
        );
        self.write_contents(&mut result);
        result += "</svg>\n";
        result
    }

    /// Appends the scene as a nested `<svg>` element occupying the square
    /// `side` wide at `(x, y)` of the enclosing document.
    pub fn write_svg_element(&self, out: &mut String, x: f64, y: f64, side: f64) {
        *out += &format!(
            "<svg x=\"{}\" y=\"{}\" width=\"{2}\" height=\"{2}\" viewBox=\"0 0 {3} {3}\">\n",
            Num(x),
            Num(y),
            Num(side),
            self.size
        );
        self.write_contents(out);
        *out += "</svg>\n";
    }

    fn write_contents(&self, out: &mut String) {
        if let Some(gradient) = &self.gradient {
            *out += "\t<defs>\n";
            write_gradient(out, gradient);
            *out += "\t</defs>\n";
        }
        if let Some(bg) = self.background {
            *out += &format!("\t<rect width=\"{0}\" height=\"{0}\" fill=\"{1}\"/>\n", self.size, bg);
        }
        match &self.body {
            Body::Glyphs { path, instances } => {
                for glyph in instances {
                    *out += &format!(
                        "\t<path d=\"{}\" transform=\"{}\" fill=\"{}\"/>\n",
                        path,
                        glyph.transform,
                        fill_attr(glyph.fill)
                    );
                }
            }
            Body::Merged { path, fill, .. } => {
                if !path.is_empty() {
                    *out += &format!("\t<path d=\"{}\" fill=\"{}\"/>\n", path, fill_attr(*fill));
                }
            }
        }
        for eye in &self.eyes {
            *out += &format!("\t<g transform=\"translate({} {})\">\n", eye.origin.0, eye.origin.1);
            write_eye_shape(out, &eye.outer);
            write_eye_shape(out, &eye.inner);
            *out += "\t</g>\n";
        }
    }
}

fn fill_attr(fill: Fill) -> String {
    match fill {
        Fill::Solid(color) => color.to_hex(),
        Fill::Gradient => format!("url(#{})", GRADIENT_ID),
    }
}

fn write_eye_shape(out: &mut String, shape: &EyeShape) {
    *out += &format!("\t\t<path d=\"{}\"", shape.path);
    if !shape.transform.is_identity() {
        *out += &format!(" transform=\"{}\"", shape.transform);
    }
    if shape.even_odd {
        *out += " fill-rule=\"evenodd\"";
    }
    match shape.paint {
        Paint::Fill(fill) => *out += &format!(" fill=\"{}\"", fill_attr(fill)),
        Paint::Stroke { color, width } => {
            *out += &format!(
                " fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
                color,
                Num(width)
            )
        }
    }
    *out += "/>\n";
}

fn write_gradient(out: &mut String, gradient: &GradientDef) {
    let element = match gradient.shape {
        GradientShape::Linear { .. } => "linearGradient",
        GradientShape::Radial => "radialGradient",
    };
    *out += &format!("\t\t<{} id=\"{}\"", element, GRADIENT_ID);
    match (gradient.shape, gradient.units) {
        (GradientShape::Linear { rotation_deg }, GradientUnits::BoundingBox) => {
            *out += &format!(
                " x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\" gradientTransform=\"rotate({}, 0.5, 0.5)\"",
                Num(rotation_deg)
            );
        }
        (GradientShape::Linear { .. }, GradientUnits::Symbol(_)) => {
            if let Some(((x1, y1), (x2, y2))) = gradient.axis() {
                *out += &format!(
                    " gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                    Num(x1),
                    Num(y1),
                    Num(x2),
                    Num(y2)
                );
            }
        }
        (GradientShape::Radial, GradientUnits::BoundingBox) => {
            *out += " cx=\"0.5\" cy=\"0.5\" r=\"0.5\"";
        }
        (GradientShape::Radial, GradientUnits::Symbol(size)) => {
            let c = Num(size / 2.0);
            *out += &format!(" gradientUnits=\"userSpaceOnUse\" cx=\"{0}\" cy=\"{0}\" r=\"{0}\"", c);
        }
    }
    *out += ">\n";
    *out += &format!("\t\t\t<stop offset=\"0\" stop-color=\"{}\"/>\n", gradient.stops[0]);
    *out += &format!("\t\t\t<stop offset=\"1\" stop-color=\"{}\"/>\n", gradient.stops[1]);
    *out += &format!("\t\t</{}>\n", element);
}
