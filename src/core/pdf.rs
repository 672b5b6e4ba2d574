//! Paginated PDF assembly from a receipt raster.
//!
//! The capture is scaled to the full A4 page width. When it is taller than a
//! page, the same image is placed on every following page shifted up by one
//! page step, so each page shows the next window of the raster.

use crate::errors::{Error, Result};
use image::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

/// Page width in millimetres (A4 portrait)
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// Page height in millimetres (A4 portrait)
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Vertical distance between the windows shown on consecutive pages
pub const PAGE_STEP_MM: f32 = 295.0;

const MM_PER_INCH: f32 = 25.4;

/// Height of the image in millimetres once scaled to the page width.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn image_height_mm(width_px: u32, height_px: u32) -> f32 {
    if width_px == 0 {
        return 0.0;
    }
    height_px as f32 * PAGE_WIDTH_MM / width_px as f32
}

/// Vertical offset of the image top on each page, in millimetres from the
/// page top. The first page is always at 0; every further page is shifted up
/// by another `PAGE_STEP_MM`.
#[must_use]
pub fn page_offsets(image_height_mm: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    let mut remaining = image_height_mm - PAGE_STEP_MM;
    while remaining > 0.0 {
        offsets.push(remaining - image_height_mm);
        remaining -= PAGE_STEP_MM;
    }
    offsets
}

/// Builds the PDF bytes for a captured receipt.
#[allow(clippy::cast_precision_loss)]
pub fn build_pdf(title: &str, raster: RgbImage) -> Result<Vec<u8>> {
    let (width_px, height_px) = raster.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(Error::Document {
            message: "captured receipt is empty".to_string(),
        });
    }

    let height_mm = image_height_mm(width_px, height_px);
    // Pixels per inch that make the raster exactly one page wide.
    let dpi = width_px as f32 * MM_PER_INCH / PAGE_WIDTH_MM;
    let raster = DynamicImage::ImageRgb8(raster);

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Receipt",
    );

    for (index, offset) in page_offsets(height_mm).into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Receipt")
        };
        let layer = doc.get_page(page).get_layer(layer);

        // PDF space starts at the bottom-left corner of the page.
        let bottom = PAGE_HEIGHT_MM - (offset + height_mm);
        Image::from_dynamic_image(&raster).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(bottom)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().map_err(|e| Error::Document {
        message: format!("failed to serialize PDF: {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use image::Rgb;

    #[test]
    fn test_short_receipt_fits_one_page() {
        assert_eq!(page_offsets(120.0), vec![0.0]);
        assert_eq!(page_offsets(295.0), vec![0.0]);
    }

    #[test]
    fn test_tall_receipt_repeats_shifted_image() {
        assert_eq!(page_offsets(600.0), vec![0.0, -295.0, -590.0]);
        assert_eq!(page_offsets(300.0), vec![0.0, -295.0]);
    }

    #[test]
    fn test_image_height_preserves_aspect_ratio() {
        assert_eq!(image_height_mm(1280, 1280), 210.0);
        assert_eq!(image_height_mm(1000, 2000), 420.0);
        assert_eq!(image_height_mm(0, 100), 0.0);
    }

    #[test]
    fn test_build_pdf_produces_pdf_bytes() {
        let raster = RgbImage::from_pixel(64, 256, Rgb([255, 255, 255]));
        let bytes = build_pdf("Payment Receipt - TX-001", raster).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_build_pdf_rejects_empty_raster() {
        assert!(matches!(
            build_pdf("empty", RgbImage::new(0, 0)),
            Err(Error::Document { message: _ })
        ));
    }
}
