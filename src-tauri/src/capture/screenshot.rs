//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS.

use image::RgbaImage;
use xcap::Monitor;

/// Source of full-resolution display rasters.
pub trait ScreenSource: Send + Sync {
    /// Captures the primary display at its native pixel resolution.
    fn capture_primary(&self) -> Result<RgbaImage, CaptureError>;
}

/// `ScreenSource` backed by xcap's monitor enumeration.
pub struct XcapScreen;

impl ScreenSource for XcapScreen {
    fn capture_primary(&self) -> Result<RgbaImage, CaptureError> {
        capture_primary_monitor()
    }
}

/// Captures the primary monitor's screen.
///
/// Returns the full-screen screenshot including all pixels.
/// The caller is responsible for cropping to the user's selection.
pub fn capture_primary_monitor() -> Result<RgbaImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    log::debug!("[CAPTURE] {} display source(s) found", monitors.len());

    // Fallback: if no monitor reports as primary, use the first one
    let primary_index = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);

    let primary = monitors
        .into_iter()
        .nth(primary_index)
        .ok_or(CaptureError::NoPrimaryMonitor)?;

    primary
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No primary monitor found")]
    NoPrimaryMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    Crop(#[from] super::region::CropError),
}
