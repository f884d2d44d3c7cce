//! Screen capture domain — public API.
//!
//! This module owns the capture pipeline and the copy/save actions.
//! External code should only use the items exported here.

mod actions;
mod region;
mod screenshot;

pub use actions::{
    copy_png, default_file_name, save_png, ActionError, ActionOutcome, ArboardClipboard,
    ClipboardSink, DialogPrompt, SavePrompt,
};
pub use region::{crop_to_png_bytes, decode_png, encode_png, CropError};
pub use screenshot::{capture_primary_monitor, CaptureError, ScreenSource, XcapScreen};

use crate::selection::Rect;
use image::DynamicImage;
use std::path::PathBuf;

/// The capture side of an overlay session, as seen by the selection
/// controller.
pub trait CaptureService {
    /// Rasterizes the primary display and returns the PNG-encoded `rect`.
    fn capture_region(&self, rect: Rect) -> Result<Vec<u8>, CaptureError>;

    fn copy_to_clipboard(&self, png: &[u8]) -> ActionOutcome;

    fn save_to_file(&self, png: &[u8]) -> ActionOutcome;
}

/// Production capture service wired to the OS adapters.
///
/// Managed as Tauri state and shared by every overlay session.
pub struct CaptureCoordinator {
    screen: Box<dyn ScreenSource>,
    clipboard: Box<dyn ClipboardSink>,
    prompt: Box<dyn SavePrompt>,
    save_dir: Option<PathBuf>,
}

impl CaptureCoordinator {
    pub fn new(
        screen: Box<dyn ScreenSource>,
        clipboard: Box<dyn ClipboardSink>,
        prompt: Box<dyn SavePrompt>,
        save_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            screen,
            clipboard,
            prompt,
            save_dir,
        }
    }
}

impl CaptureService for CaptureCoordinator {
    fn capture_region(&self, rect: Rect) -> Result<Vec<u8>, CaptureError> {
        if rect.is_empty() {
            log::error!("[CAPTURE] Invalid region: {:?}", rect);
            return Err(CropError::ZeroDimension.into());
        }

        let start = std::time::Instant::now();

        let raster = self.screen.capture_primary()?;
        let capture_ms = start.elapsed().as_millis();
        log::info!(
            "[CAPTURE] Screen captured in {}ms ({}x{})",
            capture_ms,
            raster.width(),
            raster.height()
        );

        let png_bytes = crop_to_png_bytes(&DynamicImage::ImageRgba8(raster), rect)?;

        let crop_ms = start.elapsed().as_millis() - capture_ms;
        log::info!(
            "[CAPTURE] Cropped region ({}x{} at {},{}) in {}ms — {} bytes",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            crop_ms,
            png_bytes.len()
        );

        Ok(png_bytes)
    }

    fn copy_to_clipboard(&self, png: &[u8]) -> ActionOutcome {
        copy_png(self.clipboard.as_ref(), png)
    }

    fn save_to_file(&self, png: &[u8]) -> ActionOutcome {
        save_png(self.prompt.as_ref(), self.save_dir.as_deref(), png)
    }
}
