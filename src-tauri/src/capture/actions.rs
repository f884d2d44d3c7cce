//! Copy and save actions for a captured region.
//!
//! Both actions are best-effort: failures are logged and reported as an
//! `ActionOutcome`, never propagated. The overlay lifecycle decides what to
//! do with the outcome.

use super::region::decode_png;
use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::DialogExt;

/// Result of a copy or save request.
#[derive(Debug)]
pub enum ActionOutcome {
    Copied,
    Saved(PathBuf),
    /// The user dismissed the save dialog.
    Cancelled,
    Failed(ActionError),
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Capture buffer is not a valid image: {0}")]
    Decode(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for image copies.
pub trait ClipboardSink: Send + Sync {
    fn write_image(&self, image: &RgbaImage) -> Result<(), ActionError>;
}

/// Asks the user where to save. `None` means the user cancelled.
pub trait SavePrompt: Send + Sync {
    fn prompt(&self, directory: Option<&Path>, file_name: &str) -> Option<PathBuf>;
}

/// System clipboard via `arboard`.
pub struct ArboardClipboard;

impl ClipboardSink for ArboardClipboard {
    fn write_image(&self, image: &RgbaImage) -> Result<(), ActionError> {
        let mut clipboard = Clipboard::new().map_err(|e| ActionError::Clipboard(e.to_string()))?;
        let data = ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        };
        clipboard
            .set_image(data)
            .map_err(|e| ActionError::Clipboard(e.to_string()))
    }
}

/// Native save dialog via `tauri-plugin-dialog`, parented to the overlay.
pub struct DialogPrompt {
    app: AppHandle,
}

impl DialogPrompt {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SavePrompt for DialogPrompt {
    fn prompt(&self, directory: Option<&Path>, file_name: &str) -> Option<PathBuf> {
        let mut dialog = self
            .app
            .dialog()
            .file()
            .set_title("Save Screenshot")
            .set_file_name(file_name)
            .add_filter("Images", &["png"]);

        if let Some(dir) = directory {
            dialog = dialog.set_directory(dir);
        }
        if let Some(window) = self.app.get_webview_window(crate::overlay::OVERLAY_LABEL) {
            dialog = dialog.set_parent(&window);
        }

        // Must not run on the main thread; callers are inside spawn_blocking.
        let chosen = dialog.blocking_save_file()?;
        match chosen.into_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("[ACTION] Save dialog returned an unusable path: {}", e);
                None
            }
        }
    }
}

/// Default file name offered by the save dialog.
pub fn default_file_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("screenshot-{}.png", millis)
}

/// Decodes the PNG buffer and writes it to the clipboard as an image.
pub fn copy_png(clipboard: &dyn ClipboardSink, png: &[u8]) -> ActionOutcome {
    let image = match decode_png(png) {
        Ok(image) => image,
        Err(e) => return failed(ActionError::Decode(e.to_string())),
    };

    match clipboard.write_image(&image) {
        Ok(()) => {
            log::info!(
                "[ACTION] Screenshot copied to clipboard ({}x{})",
                image.width(),
                image.height()
            );
            ActionOutcome::Copied
        }
        Err(e) => failed(e),
    }
}

/// Prompts for a destination and writes the PNG bytes verbatim.
///
/// An existing file at the chosen path is overwritten.
pub fn save_png(prompt: &dyn SavePrompt, directory: Option<&Path>, png: &[u8]) -> ActionOutcome {
    let file_name = default_file_name(SystemTime::now());

    let Some(path) = prompt.prompt(directory, &file_name) else {
        log::info!("[ACTION] Save cancelled");
        return ActionOutcome::Cancelled;
    };

    match std::fs::write(&path, png) {
        Ok(()) => {
            log::info!("[ACTION] Screenshot saved to {} ({} bytes)", path.display(), png.len());
            ActionOutcome::Saved(path)
        }
        Err(source) => failed(ActionError::Write { path, source }),
    }
}

fn failed(error: ActionError) -> ActionOutcome {
    log::error!("[ACTION] {}", error);
    ActionOutcome::Failed(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::region::encode_png;
    use image::{DynamicImage, Rgba};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingClipboard {
        images: Mutex<Vec<RgbaImage>>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn write_image(&self, image: &RgbaImage) -> Result<(), ActionError> {
            if self.fail {
                return Err(ActionError::Clipboard("no display".into()));
            }
            self.images.lock().unwrap().push(image.clone());
            Ok(())
        }
    }

    struct FixedPrompt(Option<PathBuf>);

    impl SavePrompt for FixedPrompt {
        fn prompt(&self, _directory: Option<&Path>, file_name: &str) -> Option<PathBuf> {
            assert!(file_name.starts_with("screenshot-") && file_name.ends_with(".png"));
            self.0.clone()
        }
    }

    fn sample_png() -> (RgbaImage, Vec<u8>) {
        let image = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let png = encode_png(&DynamicImage::ImageRgba8(image.clone())).unwrap();
        (image, png)
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("region-snip-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_file_name_uses_unix_millis() {
        let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(default_file_name(now), "screenshot-1700000000123.png");
    }

    #[test]
    fn copy_writes_decoded_pixels() {
        let (image, png) = sample_png();
        let clipboard = RecordingClipboard::default();

        assert!(matches!(copy_png(&clipboard, &png), ActionOutcome::Copied));
        assert_eq!(clipboard.images.lock().unwrap().as_slice(), &[image]);
    }

    #[test]
    fn copy_failure_is_reported_not_raised() {
        let (_, png) = sample_png();
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(
            copy_png(&clipboard, &png),
            ActionOutcome::Failed(ActionError::Clipboard(_))
        ));
    }

    #[test]
    fn copy_of_garbage_buffer_fails_to_decode() {
        let clipboard = RecordingClipboard::default();
        assert!(matches!(
            copy_png(&clipboard, b"garbage"),
            ActionOutcome::Failed(ActionError::Decode(_))
        ));
        assert!(clipboard.images.lock().unwrap().is_empty());
    }

    #[test]
    fn cancelled_save_writes_nothing() {
        let (_, png) = sample_png();
        let dir = scratch_dir("cancel");

        let outcome = save_png(&FixedPrompt(None), Some(&dir), &png);

        assert!(matches!(outcome, ActionOutcome::Cancelled));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let (_, png) = sample_png();
        let dir = scratch_dir("overwrite");
        let target = dir.join("shot.png");
        std::fs::write(&target, b"old contents").unwrap();

        let outcome = save_png(&FixedPrompt(Some(target.clone())), Some(&dir), &png);

        assert!(matches!(outcome, ActionOutcome::Saved(ref p) if p == &target));
        assert_eq!(std::fs::read(&target).unwrap(), png);
    }

    #[test]
    fn save_to_missing_directory_fails() {
        let (_, png) = sample_png();
        let target = scratch_dir("missing").join("nope").join("shot.png");

        let outcome = save_png(&FixedPrompt(Some(target)), None, &png);

        assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Write { .. })));
    }
}
