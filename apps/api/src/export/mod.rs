//! Export pipeline: rendered preview → bitmap → PDF download.
//!
//! 1. Render the document snapshot to HTML (pure, same output as the preview).
//! 2. Rasterize it at `scale`× for sharper output.
//! 3. Scale the bitmap to the page width and embed it (`pdf::assemble_pdf`).
//! 4. Name the file after the person on the resume.
//!
//! A failure at any step leaves the editor untouched and can be retried.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::document::ResumeDocument;
use crate::render::html::PAGE_WIDTH_PX;
use crate::render::{render_document_html, DisplayOptions};

pub mod pdf;
pub mod rasterizer;

pub use pdf::{PageSize, A4};
pub use rasterizer::{CaptureRequest, HttpRasterizer, Rasterizer};

pub const DEFAULT_SCALE: f32 = 2.0;
const FALLBACK_FILENAME: &str = "Resume.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Rasterizer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rasterizer returned status {status}: {message}")]
    Rasterizer { status: u16, message: String },

    #[error("Captured image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Captured image is empty")]
    EmptyCapture,

    #[error("PDF assembly failed: {0}")]
    Assemble(String),
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    scale: f32,
    page: PageSize,
}

impl ExportPipeline {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, scale: f32) -> Self {
        Self {
            rasterizer,
            scale,
            page: A4,
        }
    }

    pub async fn export(
        &self,
        document: &ResumeDocument,
        options: DisplayOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let html = render_document_html(document, options);
        let capture = self
            .rasterizer
            .capture(CaptureRequest {
                html: &html,
                viewport_width_px: PAGE_WIDTH_PX,
                scale: self.scale,
            })
            .await?;

        let filename = export_filename(&document.personal.name);
        let title = document.title.clone();
        let page = self.page;
        let bytes = tokio::task::spawn_blocking(move || pdf::assemble_pdf(&capture, &title, page))
            .await
            .map_err(|e| ExportError::Assemble(format!("spawn_blocking failed: {e}")))??;

        info!("Exported {filename} ({} bytes)", bytes.len());
        Ok(ExportArtifact { filename, bytes })
    }
}

/// `"Anna Muster"` → `"Anna_Muster_Resume.pdf"`; blank names get a fixed fallback.
pub fn export_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let stem = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{stem}_Resume.pdf")
    }
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    /// Produces a blank page-shaped bitmap, or fails on demand.
    #[derive(Default)]
    pub struct FakeRasterizer {
        pub fail: AtomicBool,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl Rasterizer for FakeRasterizer {
        async fn capture(&self, request: CaptureRequest<'_>) -> Result<DynamicImage, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ExportError::Rasterizer {
                    status: 503,
                    message: "renderer down".to_string(),
                });
            }
            let width = (request.viewport_width_px as f32 * request.scale) as u32 / 8;
            let height = width * 297 / 210;
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                width,
                height,
                Rgb([255, 255, 255]),
            )))
        }
    }
}
