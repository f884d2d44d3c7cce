//! Pure region cropping and PNG codec — functional core.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use crate::selection::{Rect, Size};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Crops a `DynamicImage` to the specified rectangle and returns PNG bytes.
///
/// A rectangle that overhangs the image is logged and clamped to it, so the
/// result may be smaller than requested. A rectangle with no pixels inside
/// the image is an error.
pub fn crop_to_png_bytes(image: &DynamicImage, rect: Rect) -> Result<Vec<u8>, CropError> {
    if rect.is_empty() {
        return Err(CropError::ZeroDimension);
    }

    let image_size = Size::new(image.width(), image.height());

    if rect.exceeds(image_size) {
        log::warn!(
            "[CAPTURE] Region ({},{} {}x{}) exceeds screen {}x{} — clamping",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            image_size.width,
            image_size.height
        );
    }

    let clamped = rect.clamp_to(image_size).ok_or(CropError::OutsideImage {
        requested: rect,
        image_size,
    })?;

    let cropped = image.crop_imm(
        clamped.x as u32,
        clamped.y as u32,
        clamped.width,
        clamped.height,
    );

    encode_png(&cropped)
}

/// Encodes an image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;
    Ok(png_bytes)
}

/// Decodes PNG bytes back into RGBA pixels.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, CropError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| CropError::DecodingFailed(e.to_string()))?;
    Ok(image.to_rgba8())
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) lies outside the image ({}x{})",
        requested.x, requested.y, requested.width, requested.height,
        image_size.width, image_size.height
    )]
    OutsideImage { requested: Rect, image_size: Size },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    #[error("PNG decoding failed: {0}")]
    DecodingFailed(String),
}
