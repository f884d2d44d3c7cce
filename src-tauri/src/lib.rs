//! Region Snip — Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - Global hotkey (hotkey.rs) and system tray (tray.rs)
//! - Overlay lifecycle (overlay.rs) and selection domain (selection/)
//! - Screen capture and copy/save actions (capture/)
//! - Tauri command handlers for the overlay page

pub mod capture;
pub mod config;
mod hotkey;
pub mod overlay;
pub mod selection;
mod tray;

use capture::{ArboardClipboard, CaptureCoordinator, DialogPrompt, XcapScreen};
use config::AppConfig;
use overlay::{OverlayEvent, OverlayState};
use selection::{OverlayView, Point};
use tauri::{Manager, RunEvent};

/// Runs an overlay event on the blocking pool and returns the view to draw.
///
/// `None` tells the page the overlay is gone.
async fn dispatch(app: tauri::AppHandle, event: OverlayEvent) -> Result<Option<OverlayView>, String> {
    tokio::task::spawn_blocking(move || overlay::handle_event(&app, event))
        .await
        .map_err(|e| format!("Overlay task failed: {}", e))
}

/// Tauri command: pointer pressed on the overlay.
#[tauri::command]
async fn overlay_pointer_down(app: tauri::AppHandle, x: i32, y: i32) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::PointerDown(Point::new(x, y))).await
}

/// Tauri command: pointer moved on the overlay.
#[tauri::command]
async fn overlay_pointer_move(app: tauri::AppHandle, x: i32, y: i32) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::PointerMove(Point::new(x, y))).await
}

/// Tauri command: pointer released — captures the selection.
#[tauri::command]
async fn overlay_pointer_up(app: tauri::AppHandle) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::PointerUp).await
}

/// Tauri command: keystroke on the overlay (Escape, Ctrl+C, Ctrl+S).
#[tauri::command]
async fn overlay_key(app: tauri::AppHandle, key: String, ctrl: bool) -> Result<Option<OverlayView>, String> {
    let event = OverlayEvent::from_key(&key, ctrl).unwrap_or(OverlayEvent::Refresh);
    dispatch(app, event).await
}

/// Tauri command: Copy button.
#[tauri::command]
async fn overlay_copy(app: tauri::AppHandle) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::Copy).await
}

/// Tauri command: Save button.
#[tauri::command]
async fn overlay_save(app: tauri::AppHandle) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::Save).await
}

/// Tauri command: close the overlay and discard the session.
#[tauri::command]
async fn overlay_cancel(app: tauri::AppHandle) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::Cancel).await
}

/// Tauri command: current view, used by the page on load.
#[tauri::command]
async fn overlay_view(app: tauri::AppHandle) -> Result<Option<OverlayView>, String> {
    dispatch(app, OverlayEvent::Refresh).await
}

/// Entry point — called by Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .manage(OverlayState::new())
        .invoke_handler(tauri::generate_handler![
            overlay_pointer_down,
            overlay_pointer_move,
            overlay_pointer_up,
            overlay_key,
            overlay_copy,
            overlay_save,
            overlay_cancel,
            overlay_view,
        ])
        .setup(move |app| {
            log::info!("Region Snip starting up");

            app.manage(CaptureCoordinator::new(
                Box::new(XcapScreen),
                Box::new(ArboardClipboard),
                Box::new(DialogPrompt::new(app.handle().clone())),
                config.save_dir.clone(),
            ));

            tray::setup_tray(app.handle(), &config.hotkey_label)?;
            hotkey::register_capture_hotkey(app.handle(), config.hotkey, &config.hotkey_label)?;

            log::info!("Ready — press {} to capture a region", config.hotkey_label);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("Error building Region Snip")
        .run(|app, event| match event {
            // Closing the overlay must not end the resident process.
            RunEvent::ExitRequested { code: None, api, .. } => api.prevent_exit(),
            RunEvent::Exit => {
                overlay::close_overlay(app);
                hotkey::unregister_all(app);
                log::info!("Region Snip exiting");
            }
            _ => {}
        });
}
