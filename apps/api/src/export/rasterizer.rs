use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::export::ExportError;

/// What to capture: a self-contained HTML page laid out at a fixed viewport width.
#[derive(Debug, Clone, Copy)]
pub struct CaptureRequest<'a> {
    pub html: &'a str,
    pub viewport_width_px: u32,
    /// Device pixel ratio; > 1 captures at higher resolution than the layout.
    pub scale: f32,
}

/// Turns rendered preview markup into a bitmap.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn capture(&self, request: CaptureRequest<'_>) -> Result<DynamicImage, ExportError>;
}

#[derive(Debug, Serialize)]
struct ScreenshotRequest<'a> {
    html: &'a str,
    width: u32,
    device_scale_factor: f32,
    full_page: bool,
    format: &'a str,
}

/// Rasterizer backed by a headless-browser screenshot service.
///
/// The service receives the HTML and answers with a full-page PNG.
#[derive(Clone)]
pub struct HttpRasterizer {
    client: Client,
    endpoint: String,
}

impl HttpRasterizer {
    pub fn new(endpoint: String) -> Result<Self, ExportError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl Rasterizer for HttpRasterizer {
    async fn capture(&self, request: CaptureRequest<'_>) -> Result<DynamicImage, ExportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScreenshotRequest {
                html: request.html,
                width: request.viewport_width_px,
                device_scale_factor: request.scale,
                full_page: true,
                format: "png",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExportError::Rasterizer {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ExportError::EmptyCapture);
        }
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        debug!("Captured preview at {}x{} px", image.width(), image.height());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use httpmock::prelude::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};

    use super::*;

    fn capture_request() -> CaptureRequest<'static> {
        CaptureRequest {
            html: "<html><body>Anna</body></html>",
            viewport_width_px: 794,
            scale: 2.0,
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_capture_decodes_png_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/screenshot")
                    .json_body_partial(r#"{"width": 794, "full_page": true, "format": "png"}"#);
                then.status(200)
                    .header("Content-Type", "image/png")
                    .body(png_bytes(8, 12));
            })
            .await;

        let rasterizer = HttpRasterizer::new(server.url("/screenshot")).unwrap();
        let image = rasterizer.capture(capture_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!((image.width(), image.height()), (8, 12));
    }

    #[tokio::test]
    async fn test_capture_maps_service_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/screenshot");
                then.status(503).body("browser pool exhausted");
            })
            .await;

        let rasterizer = HttpRasterizer::new(server.url("/screenshot")).unwrap();
        let err = rasterizer.capture(capture_request()).await.unwrap_err();
        match err {
            ExportError::Rasterizer { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "browser pool exhausted");
            }
            other => panic!("expected a rasterizer error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_capture_rejects_empty_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/screenshot");
                then.status(200).header("Content-Type", "image/png");
            })
            .await;

        let rasterizer = HttpRasterizer::new(server.url("/screenshot")).unwrap();
        let err = rasterizer.capture(capture_request()).await.unwrap_err();
        assert!(matches!(err, ExportError::EmptyCapture), "got {err:?}");
    }
}
