//! Rasterization and bitmap encoding.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::compose::Snapshot;
use crate::error::ExportError;

/// System fonts, loaded once, for frame captions.
static FONTS: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} font faces", db.len());
    Arc::new(db)
});

/// Renders SVG markup onto a `width` x `height` canvas, stretching the
/// document's own size to fit.
///
/// # Errors
///
/// [`ExportError::Svg`] for markup the parser rejects and
/// [`ExportError::Canvas`] for a zero or oversized canvas.
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<RgbaImage, ExportError> {
    let options = usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Canvas { width, height })?;
    let size = tree.size();
    let transform = Transform::from_scale(width as f32 / size.width(), height as f32 / size.height());
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut img = RgbaImage::new(width, height);
    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(img)
}

/// Rasterizes a snapshot at `scale` times its own size.
pub fn capture(snapshot: &Snapshot, scale: f64) -> Result<RgbaImage, ExportError> {
    let width = (snapshot.width * scale).round().max(1.0) as u32;
    let height = (snapshot.height * scale).round().max(1.0) as u32;
    log::debug!(
        "capturing {}x{} composition at {:.3}x into {}x{}",
        snapshot.width,
        snapshot.height,
        scale,
        width,
        height
    );
    rasterize(&snapshot.svg, width, height)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// JPEG has no alpha channel; transparent areas come out white.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let flat = flatten_on_white(img);
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&flat)?;
    Ok(out)
}

pub fn flatten_on_white(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
