//! Decorative frames.
//!
//! A frame wraps the rendered art: it decides the outer size of the
//! composition, where the art goes, and what is drawn beneath and above it.
//! Frames only ever see the art as an opaque square of a given pixel size,
//! plus their color and text props.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::scene::{escape_xml, rounded_rect, Num};

const FONT: &str = "font-family=\"Helvetica, Arial, sans-serif\" font-weight=\"bold\"";

/// Props handed to a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameProps {
    pub color: Color,
    pub text_color: Color,
    pub text: String,
}

impl Default for FrameProps {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            text_color: Color::WHITE,
            text: "SCAN ME".to_string(),
        }
    }
}

/// Where a frame puts the art and what it draws around it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub width: f64,
    pub height: f64,
    /// Top-left corner of the art square.
    pub content_x: f64,
    pub content_y: f64,
    /// Markup drawn before the art.
    pub under: String,
    /// Markup drawn after the art.
    pub over: String,
}

impl FrameLayout {
    /// The art on its own, no decoration.
    pub fn bare(content_px: f64) -> Self {
        Self {
            width: content_px,
            height: content_px,
            content_x: 0.0,
            content_y: 0.0,
            under: String::new(),
            over: String::new(),
        }
    }
}

/// The frame wrapper contract.
pub trait FrameWrapper: fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;

    /// Lays the frame out around an art square `content_px` wide.
    fn layout(&self, content_px: f64, props: &FrameProps) -> FrameLayout;
}

/// The stock frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinFrame {
    #[default]
    None,
    ScanMe1,
    ScanMe2,
    Balloon,
    Border,
}

impl BuiltinFrame {
    pub const ALL: [BuiltinFrame; 5] = [
        BuiltinFrame::None,
        BuiltinFrame::ScanMe1,
        BuiltinFrame::ScanMe2,
        BuiltinFrame::Balloon,
        BuiltinFrame::Border,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuiltinFrame::None => "None",
            BuiltinFrame::ScanMe1 => "Scan Me 1",
            BuiltinFrame::ScanMe2 => "Scan Me 2",
            BuiltinFrame::Balloon => "Balloon",
            BuiltinFrame::Border => "Simple Border",
        }
    }

    /// Looks `id` up, falling back to no frame for unknown ids.
    pub fn resolve(id: &str) -> Self {
        id.parse().unwrap_or_else(|_| {
            log::warn!("unknown frame {:?}, rendering without a frame", id);
            BuiltinFrame::None
        })
    }
}

impl FromStr for BuiltinFrame {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinFrame::ALL
            .into_iter()
            .find(|frame| frame.id() == s)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "frame",
                value: s.to_string(),
            })
    }
}

impl FrameWrapper for BuiltinFrame {
    fn id(&self) -> &'static str {
        match self {
            BuiltinFrame::None => "none",
            BuiltinFrame::ScanMe1 => "scan-me-1",
            BuiltinFrame::ScanMe2 => "scan-me-2",
            BuiltinFrame::Balloon => "balloon",
            BuiltinFrame::Border => "border",
        }
    }

    fn layout(&self, c: f64, props: &FrameProps) -> FrameLayout {
        match self {
            BuiltinFrame::None => FrameLayout::bare(c),
            BuiltinFrame::ScanMe1 => scan_me_1(c, props),
            BuiltinFrame::ScanMe2 => scan_me_2(c, props),
            BuiltinFrame::Balloon => balloon(c, props),
            BuiltinFrame::Border => border(c, props),
        }
    }
}

/// Frame choice carried by an export request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSelection {
    pub id: String,
    pub props: FrameProps,
}

impl FrameSelection {
    pub fn none() -> Self {
        Self {
            id: "none".to_string(),
            props: FrameProps::default(),
        }
    }

    pub fn new(id: impl Into<String>, props: FrameProps) -> Self {
        Self { id: id.into(), props }
    }

    pub fn frame(&self) -> BuiltinFrame {
        if self.id.is_empty() {
            return BuiltinFrame::None;
        }
        BuiltinFrame::resolve(&self.id)
    }

    /// True when the id resolves to an actual decoration.
    pub fn is_present(&self) -> bool {
        self.frame() != BuiltinFrame::None
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64, r: f64, attrs: &str) -> String {
    format!("<path d=\"{}\" {}/>\n", rounded_rect(x, y, w, h, r), attrs)
}

fn text(x: f64, y: f64, size: f64, fill: Color, content: &str) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" {} font-size=\"{}\" fill=\"{}\">{}</text>\n",
        Num(x),
        Num(y),
        FONT,
        Num(size),
        fill,
        escape_xml(content)
    )
}

/// Rough width of bold text, used to size pills around it.
fn text_width(content: &str, size: f64) -> f64 {
    content.chars().count() as f64 * size * 0.62
}

/// Banner pill above a bordered box.
fn scan_me_1(c: f64, props: &FrameProps) -> FrameLayout {
    let (pad, banner, gap, stroke, inset) = (16.0, 28.0, 8.0, 4.0, 8.0);
    let label = props.text.to_uppercase();
    let boxed = c + 2.0 * (stroke + inset);
    let width = boxed + 2.0 * pad;
    let height = pad + banner + gap + boxed + pad;
    let pill = (text_width(&label, 14.0) + 48.0).min(boxed);
    let box_y = pad + banner + gap;

    let mut under = rect(0.0, 0.0, width, height, 12.0, "fill=\"#ffffff\"");
    under += &rect((width - pill) / 2.0, pad, pill, banner, banner / 2.0, &format!("fill=\"{}\"", props.color));
    under += &text(width / 2.0, pad + banner / 2.0, 14.0, props.text_color, &label);
    under += &rect(
        pad + stroke / 2.0,
        box_y + stroke / 2.0,
        boxed - stroke,
        boxed - stroke,
        12.0,
        &format!("fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"", props.color, Num(stroke)),
    );
    FrameLayout {
        width,
        height,
        content_x: pad + stroke + inset,
        content_y: box_y + stroke + inset,
        under,
        over: String::new(),
    }
}

/// Bordered card with a solid caption band along the bottom.
fn scan_me_2(c: f64, props: &FrameProps) -> FrameLayout {
    let (stroke, pad, band) = (4.0, 20.0, 40.0);
    let width = c + 2.0 * (stroke + pad);
    let height = stroke + pad + c + pad + band + stroke;
    let band_y = height - stroke - band;

    let mut under = rect(0.0, 0.0, width, height, 8.0, "fill=\"#ffffff\"");
    under += &format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        Num(stroke),
        Num(band_y),
        Num(width - 2.0 * stroke),
        Num(band),
        props.color
    );
    under += &text(width / 2.0, band_y + band / 2.0, 18.0, props.text_color, &props.text.to_uppercase());
    let over = rect(
        stroke / 2.0,
        stroke / 2.0,
        width - stroke,
        height - stroke,
        8.0,
        &format!("fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"", props.color, Num(stroke)),
    );
    FrameLayout {
        width,
        height,
        content_x: stroke + pad,
        content_y: stroke + pad,
        under,
        over,
    }
}

/// Speech bubble with a pointer above an outlined card.
fn balloon(c: f64, props: &FrameProps) -> FrameLayout {
    let (bubble, pointer, gap, stroke, inset) = (48.0, 10.0, 12.0, 2.0, 12.0);
    let boxed = c + 2.0 * (stroke + inset);
    let width = boxed;
    let height = bubble + gap + boxed;
    let bubble_w = (text_width(&props.text, 18.0) + 48.0).min(width - stroke);
    let cx = width / 2.0;
    let outline = format!("stroke=\"{}\" stroke-width=\"{}\"", props.color, Num(stroke));
    let box_y = bubble + gap;

    let mut under = rect(
        (width - bubble_w) / 2.0,
        stroke / 2.0,
        bubble_w,
        bubble - stroke,
        bubble / 2.0,
        &format!("fill=\"#ffffff\" {}", outline),
    );
    under += &format!(
        "<path d=\"M{},{}L{},{}L{},{}\" fill=\"#ffffff\" {} stroke-linejoin=\"round\"/>\n",
        Num(cx - pointer),
        Num(bubble - stroke),
        Num(cx),
        Num(bubble - stroke + pointer),
        Num(cx + pointer),
        Num(bubble - stroke),
        outline
    );
    under += &text(cx, bubble / 2.0, 18.0, props.color, &props.text);
    under += &rect(
        stroke / 2.0,
        box_y + stroke / 2.0,
        boxed - stroke,
        boxed - stroke,
        12.0,
        &format!("fill=\"#ffffff\" {}", outline),
    );
    FrameLayout {
        width,
        height,
        content_x: stroke + inset,
        content_y: box_y + stroke + inset,
        under,
        over: String::new(),
    }
}

/// Dashed outline.
fn border(c: f64, props: &FrameProps) -> FrameLayout {
    let (stroke, pad) = (4.0, 16.0);
    let side = c + 2.0 * (stroke + pad);
    let mut under = rect(0.0, 0.0, side, side, 12.0, "fill=\"#ffffff\"");
    under += &rect(
        stroke / 2.0,
        stroke / 2.0,
        side - stroke,
        side - stroke,
        12.0,
        &format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"12 8\"",
            props.color,
            Num(stroke)
        ),
    );
    FrameLayout {
        width: side,
        height: side,
        content_x: stroke + pad,
        content_y: stroke + pad,
        under,
        over: String::new(),
    }
}
