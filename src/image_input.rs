//! # Label Image Input
//!
//! Validated in-memory image buffer handed to the recognition engines. The
//! pipeline treats the pixel data as opaque bytes plus dimensions; only the
//! container format and size bounds are checked here, never the content.
//!
//! ## Supported Image Formats
//!
//! - PNG (Portable Network Graphics)
//! - JPEG/JPG (Joint Photographic Experts Group)
//! - BMP (Bitmap)
//! - TIFF/TIF (Tagged Image File Format)

use std::io::Cursor;

use image::ImageFormat;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Formats accepted by both recognition engines
const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

/// An image buffer in a standard raster encoding, plus its pixel dimensions
#[derive(Debug, Clone)]
pub struct LabelImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    format: ImageFormat,
}

impl LabelImage {
    /// Validate a raw buffer and probe its format and dimensions.
    ///
    /// Only the image header is read; pixel data is not decoded. Rejects
    /// empty buffers, buffers over `max_file_size` bytes, and formats
    /// outside the supported set.
    pub fn from_bytes(bytes: Vec<u8>, max_file_size: u64) -> AppResult<Self> {
        if bytes.is_empty() {
            return Err(AppError::Validation("image buffer is empty".to_string()));
        }
        if bytes.len() as u64 > max_file_size {
            return Err(AppError::Validation(format!(
                "image too large: {} bytes (maximum allowed: {} bytes)",
                bytes.len(),
                max_file_size
            )));
        }

        let format = image::guess_format(&bytes).map_err(|e| {
            AppError::Validation(format!("could not determine image format: {}", e))
        })?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(AppError::Validation(format!(
                "unsupported image format: {:?}",
                format
            )));
        }

        let reader = image::ImageReader::with_format(Cursor::new(&bytes), format);
        let (width, height) = reader.into_dimensions().map_err(|e| {
            AppError::Validation(format!("could not read image dimensions: {}", e))
        })?;

        debug!(
            format = ?format,
            width,
            height,
            size_bytes = bytes.len(),
            "Validated label image"
        );

        Ok(Self {
            bytes,
            width,
            height,
            format,
        })
    }

    /// Raw encoded image bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Detected container format
    pub fn format(&self) -> ImageFormat {
        self.format
    }
}
