//! Overlay lifecycle — one selection session per open overlay window.
//!
//! Closed → Open → Selecting → Ready → Closed. The session lives inside
//! `OverlayState` from the moment the window opens until it closes; every
//! overlay event is handled under its lock, one at a time.
//!
//! Copy and save always dismiss the overlay, whatever their outcome. They
//! take the session out of the lock before running, because the save dialog
//! needs the main thread and the main thread also opens and closes sessions.

use crate::capture::{ActionOutcome, CaptureCoordinator, CaptureService};
use crate::selection::{
    EndOutcome, MaskSurface, OverlayView, Phase, Point, SelectionController, Size,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::Duration;
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder, WindowEvent};

/// Window label of the overlay.
pub const OVERLAY_LABEL: &str = "overlay";

/// Time for the compositor to drop the hidden overlay before the screen is read.
const MASK_SETTLE: Duration = Duration::from_millis(80);

/// An input forwarded from the overlay page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Copy,
    Save,
    Cancel,
    /// Re-read the view without changing anything.
    Refresh,
}

impl OverlayEvent {
    /// Maps a keystroke to an overlay action.
    ///
    /// `ctrl` is true when Control (or Command on macOS) is held.
    pub fn from_key(key: &str, ctrl: bool) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Cancel),
            k if ctrl && k.eq_ignore_ascii_case("c") => Some(Self::Copy),
            k if ctrl && k.eq_ignore_ascii_case("s") => Some(Self::Save),
            _ => None,
        }
    }
}

/// Result of handling one event.
#[derive(Debug)]
pub struct Handled {
    /// The view to render, or `None` when no session is open.
    pub view: Option<OverlayView>,
    /// The overlay window should close.
    pub close: bool,
}

impl Handled {
    fn render(view: OverlayView) -> Self {
        Self {
            view: Some(view),
            close: false,
        }
    }

    fn closed() -> Self {
        Self {
            view: None,
            close: true,
        }
    }
}

/// Tauri-managed holder of the current overlay session.
pub struct OverlayState {
    session: Mutex<Option<SelectionController>>,
    /// A copy or save is running on a session already taken out of the lock.
    dismissing: AtomicBool,
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
            dismissing: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<SelectionController>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `None` when another thread is inside an event.
    fn try_lock(&self) -> Option<MutexGuard<'_, Option<SelectionController>>> {
        match self.session.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Starts a session. Returns `false`, leaving the running session alone,
    /// when one is already open or still dismissing.
    ///
    /// Never blocks: a lock held by an in-flight event means a session exists.
    pub fn open(&self, screen: Size, scale_factor: f64) -> bool {
        let Some(mut guard) = self.try_lock() else {
            log::debug!("[OVERLAY] Session busy — open refused");
            return false;
        };
        if guard.is_some() || self.dismissing.load(Ordering::Acquire) {
            return false;
        }
        *guard = Some(SelectionController::new(screen, scale_factor));
        log::info!(
            "[OVERLAY] Session opened ({}x{} @ {}x)",
            screen.width,
            screen.height,
            scale_factor
        );
        true
    }

    /// Discards the session. Returns whether one was open.
    pub fn close(&self) -> bool {
        let closed = self.lock().take().is_some();
        if closed {
            log::info!("[OVERLAY] Session closed");
        }
        closed
    }

    /// Like `close`, but skips when another thread is inside an event.
    /// Returns whether a session was discarded.
    pub fn try_close(&self) -> bool {
        let closed = self.try_lock().and_then(|mut guard| guard.take()).is_some();
        if closed {
            log::info!("[OVERLAY] Session closed");
        }
        closed
    }

    /// Phase of the open session, `None` when the overlay is closed.
    pub fn phase(&self) -> Option<Phase> {
        self.lock().as_ref().map(SelectionController::phase)
    }

    /// Runs one overlay event to completion and applies the close policy.
    pub fn handle(
        &self,
        event: OverlayEvent,
        capture: &dyn CaptureService,
        surface: &dyn MaskSurface,
    ) -> Handled {
        match event {
            OverlayEvent::Copy | OverlayEvent::Save => self.dismiss_with(event, capture),
            _ => self.handle_locked(event, capture, surface),
        }
    }

    fn handle_locked(
        &self,
        event: OverlayEvent,
        capture: &dyn CaptureService,
        surface: &dyn MaskSurface,
    ) -> Handled {
        let mut guard = self.lock();
        let Some(session) = guard.as_mut() else {
            log::debug!("[OVERLAY] {:?} with no open session", event);
            return Handled {
                view: None,
                close: false,
            };
        };

        let handled = match event {
            OverlayEvent::PointerDown(p) => Handled::render(session.begin(p)),
            OverlayEvent::PointerMove(p) => Handled::render(session.update(p)),
            OverlayEvent::PointerUp => {
                match session.end(capture, surface) {
                    EndOutcome::Failed(reason) => {
                        log::warn!("[OVERLAY] Capture failed, overlay stays open: {}", reason)
                    }
                    outcome => log::debug!("[OVERLAY] Release handled: {:?}", outcome),
                }
                Handled::render(session.view())
            }
            OverlayEvent::Copy | OverlayEvent::Save => Handled::render(session.view()),
            OverlayEvent::Cancel => {
                session.cancel_requested();
                log::info!("[OVERLAY] Cancelled");
                Handled::closed()
            }
            OverlayEvent::Refresh => Handled::render(session.view()),
        };

        if handled.close {
            *guard = None;
            log::info!("[OVERLAY] Session closed");
        }
        handled
    }

    /// Copy or save. With a buffer held, the session leaves the lock for good
    /// and the action runs unlocked; the overlay closes whatever it returns.
    fn dismiss_with(&self, event: OverlayEvent, capture: &dyn CaptureService) -> Handled {
        let mut session = {
            let mut guard = self.lock();
            match guard.as_ref() {
                None => {
                    log::debug!("[OVERLAY] {:?} with no open session", event);
                    return Handled {
                        view: None,
                        close: false,
                    };
                }
                Some(session) if !session.has_buffer() => {
                    return Handled::render(session.view());
                }
                Some(_) => {}
            }
            let Some(session) = guard.take() else {
                return Handled::closed();
            };
            self.dismissing.store(true, Ordering::Release);
            session
        };

        let outcome = match event {
            OverlayEvent::Save => session.save_requested(capture),
            _ => session.copy_requested(capture),
        };
        self.dismissing.store(false, Ordering::Release);
        log::info!("[OVERLAY] Session closed");

        match outcome {
            Some(outcome) => close_after(&outcome),
            None => Handled::closed(),
        }
    }
}

/// Every dispatched action dismisses the overlay. The outcome only decides
/// how loudly that is logged.
fn close_after(outcome: &ActionOutcome) -> Handled {
    match outcome {
        ActionOutcome::Copied => log::info!("[OVERLAY] Copied — closing"),
        ActionOutcome::Saved(path) => log::info!("[OVERLAY] Saved to {} — closing", path.display()),
        ActionOutcome::Cancelled => log::info!("[OVERLAY] Save cancelled — closing"),
        ActionOutcome::Failed(e) => log::warn!("[OVERLAY] Action failed ({}) — closing anyway", e),
    }
    Handled::closed()
}

/// `MaskSurface` that hides the whole overlay window during a capture.
struct WindowSurface<'a> {
    app: &'a AppHandle,
}

impl MaskSurface for WindowSurface<'_> {
    fn hide_mask(&self) {
        let Some(window) = self.app.get_webview_window(OVERLAY_LABEL) else {
            return;
        };
        match window.hide() {
            Ok(()) => std::thread::sleep(MASK_SETTLE),
            Err(e) => log::error!("[OVERLAY] Failed to hide overlay: {}", e),
        }
    }

    fn restore_mask(&self) {
        let Some(window) = self.app.get_webview_window(OVERLAY_LABEL) else {
            return;
        };
        if let Err(e) = window.show().and_then(|_| window.set_focus()) {
            log::error!("[OVERLAY] Failed to restore overlay: {}", e);
        }
    }
}

/// Handles an overlay event against the app's managed state and closes the
/// window when the session ends.
///
/// Blocks on capture, clipboard, and dialog calls; run it off the main thread.
pub fn handle_event(app: &AppHandle, event: OverlayEvent) -> Option<OverlayView> {
    let state = app.state::<OverlayState>();
    let coordinator = app.state::<CaptureCoordinator>();
    let surface = WindowSurface { app };

    let handled = state.handle(event, coordinator.inner(), &surface);
    if handled.close {
        close_window(app);
    }
    handled.view
}

/// Opens the overlay over the primary display. Ignored while one is open.
///
/// Runs on the main thread, so it never waits on the session lock.
pub fn open_overlay(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    if app.get_webview_window(OVERLAY_LABEL).is_some() {
        log::info!("[OVERLAY] Already open — request ignored");
        return Ok(());
    }
    let state = app.state::<OverlayState>();

    let monitor = app.primary_monitor()?.ok_or("No primary monitor")?;
    let scale_factor = monitor.scale_factor();
    let size = monitor.size().to_logical::<f64>(scale_factor);
    let origin = monitor.position().to_logical::<f64>(scale_factor);

    let screen = Size::new(size.width.round() as u32, size.height.round() as u32);
    if !state.open(screen, scale_factor) {
        log::info!("[OVERLAY] Session still active — request ignored");
        return Ok(());
    }

    let built = WebviewWindowBuilder::new(app, OVERLAY_LABEL, WebviewUrl::App("index.html".into()))
        .title("Region Snip Overlay")
        .inner_size(size.width, size.height)
        .position(origin.x, origin.y)
        .transparent(true)
        .decorations(false)
        .shadow(false)
        .resizable(false)
        .skip_taskbar(true)
        .focused(true)
        .build();

    let window = match built {
        Ok(window) => window,
        Err(e) => {
            state.close();
            return Err(e.into());
        }
    };

    // Closed by the window manager rather than by us: drop the session too,
    // off the main thread in case an event holds the lock.
    let handle = app.clone();
    window.on_window_event(move |event| {
        if let WindowEvent::Destroyed = event {
            let handle = handle.clone();
            tauri::async_runtime::spawn_blocking(move || {
                handle.state::<OverlayState>().close();
            });
        }
    });

    window.set_focus()?;
    log::info!("[OVERLAY] Overlay opened");
    Ok(())
}

/// Discards the session and closes the overlay window. Does not wait for an
/// in-flight event.
pub fn close_overlay(app: &AppHandle) {
    app.state::<OverlayState>().try_close();
    close_window(app);
}

fn close_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(OVERLAY_LABEL) {
        if let Err(e) = window.close() {
            log::error!("[OVERLAY] Error closing window: {}", e);
        }
    }
}
