//! Composition of frame, art and logo into one SVG document.
//!
//! A [`Snapshot`] owns everything it needs. Exports rasterize their own
//! snapshot, so a later style change can never reach into an export that is
//! already running.

use crate::color::Color;
use crate::frame::{FrameProps, FrameWrapper};
use crate::logo::{LogoPlacement, PreparedLogo};
use crate::scene::{Num, Scene};

/// Owned, fully composed SVG markup and its size in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub svg: String,
    pub width: f64,
    pub height: f64,
}

/// Lays `scene` out `art_px` wide inside `frame`, then places the logo over
/// the art.
pub fn compose(
    scene: &Scene,
    art_px: f64,
    frame: &dyn FrameWrapper,
    props: &FrameProps,
    logo: Option<&PreparedLogo>,
    plate_color: Color,
) -> Snapshot {
    let layout = frame.layout(art_px, props);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\">\n",
        Num(layout.width),
        Num(layout.height)
    );
    svg += &layout.under;
    scene.write_svg_element(&mut svg, layout.content_x, layout.content_y, art_px);
    if let Some(logo) = logo {
        LogoPlacement::compute(logo, layout.content_x, layout.content_y, art_px).write_svg(&mut svg, logo, plate_color);
    }
    svg += &layout.over;
    svg += "</svg>\n";
    Snapshot {
        svg,
        width: layout.width,
        height: layout.height,
    }
}
