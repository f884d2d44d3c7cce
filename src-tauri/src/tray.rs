//! System tray setup and click handler.
//!
//! The tray keeps the resident app reachable: left-click or "Capture
//! Region" opens the overlay, "Quit" is the only way to exit.

use crate::overlay;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle,
};

/// Sets up the system tray icon with a click handler.
///
/// Left-click: opens the overlay.
/// Right-click: opens context menu with Capture Region and Quit.
pub fn setup_tray(app: &AppHandle, hotkey_label: &str) -> Result<(), Box<dyn std::error::Error>> {
    let capture_item = MenuItemBuilder::with_id("capture", "Capture Region").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit Region Snip").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&capture_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip(format!("Region Snip — {} to capture", hotkey_label))
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                button_state: tauri::tray::MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("Tray icon clicked — opening overlay");
                open_from_tray(tray_icon.app_handle());
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "capture" => open_from_tray(app),
            "quit" => {
                log::info!("Quit requested from tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}

fn open_from_tray(app: &AppHandle) {
    if let Err(e) = overlay::open_overlay(app) {
        log::error!("Failed to open overlay: {}", e);
    }
}
