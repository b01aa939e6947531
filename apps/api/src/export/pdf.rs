//! PDF assembly: embeds a captured preview bitmap into page-sized PDF pages.
//!
//! The bitmap is scaled to the full page width with its aspect ratio kept, so
//! the rendered height is `page_width / (image_width / image_height)`. A bitmap
//! taller than one page is cut into page-height slices, one slice per page.
//! CPU-bound: callers run `assemble_pdf` inside `spawn_blocking`.

use std::io::BufWriter;

use image::{imageops, DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::export::ExportError;

const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

pub const A4: PageSize = PageSize {
    width_mm: 210.0,
    height_mm: 297.0,
};

/// Size of the whole captured image once scaled to the page width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Scales an image of `width_px` × `height_px` to fill the page width.
pub fn fit_to_width(width_px: u32, height_px: u32, page: PageSize) -> Placement {
    let aspect = width_px as f32 / height_px as f32;
    Placement {
        width_mm: page.width_mm,
        height_mm: page.width_mm / aspect,
    }
}

/// Horizontal band of the source image placed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub top_px: u32,
    pub height_px: u32,
}

/// Cuts an image into page-height bands, top to bottom.
pub fn page_slices(width_px: u32, height_px: u32, page: PageSize) -> Vec<Slice> {
    let px_per_mm = width_px as f32 / page.width_mm;
    let page_height_px = ((page.height_mm * px_per_mm).floor() as u32).max(1);

    let mut slices = Vec::new();
    let mut top = 0;
    while top < height_px {
        let height = page_height_px.min(height_px - top);
        slices.push(Slice {
            top_px: top,
            height_px: height,
        });
        top += height;
    }
    slices
}

/// A slice with its size and position on the page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBand {
    pub slice: Slice,
    pub height_mm: f32,
    /// Offset of the band's bottom edge from the bottom of the page.
    pub translate_y_mm: f32,
}

/// Lays a captured image out over pages. Band heights are each slice's
/// share of the fitted placement, and every band is pinned to the top edge
/// of its page (PDF origin is bottom-left).
pub fn page_bands(width_px: u32, height_px: u32, page: PageSize) -> Vec<PageBand> {
    let placement = fit_to_width(width_px, height_px, page);
    let mm_per_px = placement.height_mm / height_px as f32;
    page_slices(width_px, height_px, page)
        .into_iter()
        .map(|slice| {
            let height_mm = slice.height_px as f32 * mm_per_px;
            PageBand {
                slice,
                height_mm,
                translate_y_mm: page.height_mm - height_mm,
            }
        })
        .collect()
}

/// Builds the PDF bytes for a captured preview.
pub fn assemble_pdf(capture: &DynamicImage, title: &str, page: PageSize) -> Result<Vec<u8>, ExportError> {
    let rgb: RgbImage = capture.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCapture);
    }

    // DPI at which `width` pixels span exactly the placement width.
    let placement = fit_to_width(width, height, page);
    let dpi = width as f32 * MM_PER_INCH / placement.width_mm;

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(page.width_mm), Mm(page.height_mm), "Layer 1");

    for (i, band) in page_bands(width, height, page).into_iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(page.width_mm),
                Mm(page.height_mm),
                format!("Layer {}", i + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        let slice = band.slice;
        let pixels = imageops::crop_imm(&rgb, 0, slice.top_px, width, slice.height_px).to_image();

        Image::from_dynamic_image(&DynamicImage::ImageRgb8(pixels)).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(band.translate_y_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Assemble(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Assemble(format!("PDF buffer error: {e}")))
}
