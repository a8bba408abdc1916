//! Single-page PDF output.

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ExportError;

/// Builds a one-page document whose page is `page_size` points square and
/// holds `img` as its only content.
///
/// The image is fitted inside the page keeping its aspect ratio and centred.
/// The pixels are stored as a Flate-compressed DeviceRGB image with the
/// alpha channel in a DeviceGray soft mask, which renders the same as an
/// embedded PNG.
pub fn single_page(img: &RgbaImage, page_size: f64) -> Result<Vec<u8>, ExportError> {
    let (width, height) = img.dimensions();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    let mut alpha = Vec::with_capacity(width as usize * height as usize);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut smask = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    );
    smask.compress()?;
    let smask_id = doc.add_object(smask);

    let mut image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    );
    image.compress()?;
    let image_id = doc.add_object(image);

    let scale = (page_size / width as f64).min(page_size / height as f64);
    let (draw_w, draw_h) = (width as f64 * scale, height as f64 * scale);
    let (x, y) = ((page_size - draw_w) / 2.0, (page_size - draw_h) / 2.0);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (draw_w as f32).into(),
                    0.into(),
                    0.into(),
                    (draw_h as f32).into(),
                    (x as f32).into(),
                    (y as f32).into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let side: Object = (page_size as f32).into();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![0.into(), 0.into(), side.clone(), side],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    log::debug!("wrote {}-byte PDF, page {} pt, image {}x{}", out.len(), page_size, width, height);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_single_page_sized_to_target() {
        let img = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let bytes = single_page(&img, 500.0).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box.len(), 4);
        assert!((media_box[2].as_float().unwrap() as f64 - 500.0).abs() < 1e-3);
        assert!((media_box[3].as_float().unwrap() as f64 - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_square_image_still_gets_square_page() {
        let img = RgbaImage::from_pixel(40, 60, Rgba([10, 20, 30, 128]));
        let bytes = single_page(&img, 300.0).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
