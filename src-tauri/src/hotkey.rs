//! Global hotkey that opens the overlay.

use crate::overlay;
use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

/// Registers `shortcut` to open the overlay on key press.
pub fn register_capture_hotkey(
    app: &AppHandle,
    shortcut: Shortcut,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    app.global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            log::info!("[HOTKEY] Capture hotkey pressed");
            if let Err(e) = overlay::open_overlay(app) {
                log::error!("[HOTKEY] Failed to open overlay: {}", e);
            }
        })
        .map_err(|e| format!("Failed to register hotkey {}: {}", label, e))?;

    log::info!("[HOTKEY] Registered {}", label);
    Ok(())
}

/// Releases every hotkey this app registered.
pub fn unregister_all(app: &AppHandle) {
    match app.global_shortcut().unregister_all() {
        Ok(()) => log::info!("[HOTKEY] Hotkeys unregistered"),
        Err(e) => log::error!("[HOTKEY] Failed to unregister hotkeys: {}", e),
    }
}
