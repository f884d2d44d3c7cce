//! Selection controller — the state of one overlay session.
//!
//! Turns pointer gestures into a normalized rectangle, asks the capture
//! service for its pixels on release, and holds the single capture buffer
//! until a copy or save consumes it.

use super::rect::{Point, Rect, Size};
use super::view::{affordance_bounds, OverlayView, Phase};
use crate::capture::{ActionOutcome, CaptureService};

/// Hides and restores the dimming mask around a capture so it does not end
/// up in the pixels.
pub trait MaskSurface {
    fn hide_mask(&self);
    fn restore_mask(&self);
}

/// What `end()` did with the finished drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// No drag was active.
    Idle,
    /// The rectangle had no area and was dropped without capturing.
    Discarded,
    /// A new buffer of this many PNG bytes is held.
    Captured(usize),
    /// The capture failed. Any earlier buffer is kept.
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    rect: Rect,
}

struct Capture {
    rect: Rect,
    png: Vec<u8>,
}

/// Owned state of one overlay session.
pub struct SelectionController {
    screen: Size,
    scale_factor: f64,
    drag: Option<Drag>,
    capture: Option<Capture>,
    mask_visible: bool,
}

impl SelectionController {
    /// Creates a session for an overlay of `screen` logical pixels whose
    /// display has `scale_factor` physical pixels per logical pixel.
    pub fn new(screen: Size, scale_factor: f64) -> Self {
        Self {
            screen,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            drag: None,
            capture: None,
            mask_visible: true,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.drag.is_some() {
            Phase::Selecting
        } else if self.capture.is_some() {
            Phase::Ready
        } else {
            Phase::Open
        }
    }

    /// The rectangle the overlay shows: the live drag, else the captured one.
    pub fn selection(&self) -> Option<Rect> {
        self.drag
            .map(|d| d.rect)
            .or_else(|| self.capture.as_ref().map(|c| c.rect))
    }

    pub fn has_buffer(&self) -> bool {
        self.capture.is_some()
    }

    pub fn view(&self) -> OverlayView {
        OverlayView::derive(self.screen, self.selection(), self.mask_visible, self.phase())
    }

    /// Pointer pressed. Starts a zero-size rectangle unless the press lands
    /// on the Copy/Save buttons.
    pub fn begin(&mut self, pointer: Point) -> OverlayView {
        let on_affordance = self
            .selection()
            .and_then(|rect| affordance_bounds(self.screen, rect))
            .is_some_and(|bounds| bounds.contains(pointer));

        if on_affordance {
            log::debug!("[SELECT] Press on action buttons ignored");
        } else {
            self.drag = Some(Drag {
                start: pointer,
                rect: Rect::from_drag(pointer, pointer),
            });
        }

        self.view()
    }

    /// Pointer moved. Recomputes the rectangle from the drag start.
    pub fn update(&mut self, pointer: Point) -> OverlayView {
        if let Some(drag) = self.drag.as_mut() {
            drag.rect = Rect::from_drag(drag.start, pointer);
        }
        self.view()
    }

    /// Pointer released. Captures the finished rectangle.
    ///
    /// The drag is cleared whatever happens; a new drag is needed to retry.
    pub fn end(&mut self, capture: &dyn CaptureService, surface: &dyn MaskSurface) -> EndOutcome {
        let Some(drag) = self.drag.take() else {
            return EndOutcome::Idle;
        };
        let rect = drag.rect;

        if rect.is_empty() {
            log::debug!("[SELECT] Discarding empty selection {:?}", rect);
            return EndOutcome::Discarded;
        }

        self.mask_visible = false;
        surface.hide_mask();
        let result = capture.capture_region(rect.scaled(self.scale_factor));
        surface.restore_mask();
        self.mask_visible = true;

        match result {
            Ok(png) => {
                let len = png.len();
                self.capture = Some(Capture { rect, png });
                log::info!("[SELECT] Region {:?} captured ({} bytes)", rect, len);
                EndOutcome::Captured(len)
            }
            Err(e) => {
                log::error!("[SELECT] Error capturing region {:?}: {}", rect, e);
                EndOutcome::Failed(e.to_string())
            }
        }
    }

    /// Hands the buffer to the clipboard. `None` when there is nothing to copy.
    pub fn copy_requested(&mut self, capture: &dyn CaptureService) -> Option<ActionOutcome> {
        let buffer = self.capture.take()?;
        Some(capture.copy_to_clipboard(&buffer.png))
    }

    /// Hands the buffer to the save flow. `None` when there is nothing to save.
    pub fn save_requested(&mut self, capture: &dyn CaptureService) -> Option<ActionOutcome> {
        let buffer = self.capture.take()?;
        Some(capture.save_to_file(&buffer.png))
    }

    /// Escape. Drops the drag and the buffer.
    pub fn cancel_requested(&mut self) {
        self.drag = None;
        self.capture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{ActionError, CaptureError};
    use std::cell::{Cell, RefCell};

    /// Records calls and hands out a fixed result.
    #[derive(Default)]
    struct FakeCapture {
        requests: RefCell<Vec<Rect>>,
        copies: Cell<usize>,
        saves: Cell<usize>,
        fail: bool,
    }

    impl CaptureService for FakeCapture {
        fn capture_region(&self, rect: Rect) -> Result<Vec<u8>, CaptureError> {
            self.requests.borrow_mut().push(rect);
            if self.fail {
                Err(CaptureError::NoPrimaryMonitor)
            } else {
                Ok(vec![0xAB; 16])
            }
        }

        fn copy_to_clipboard(&self, png: &[u8]) -> ActionOutcome {
            assert_eq!(png, [0xABu8; 16].as_slice());
            self.copies.set(self.copies.get() + 1);
            ActionOutcome::Copied
        }

        fn save_to_file(&self, _png: &[u8]) -> ActionOutcome {
            self.saves.set(self.saves.get() + 1);
            ActionOutcome::Failed(ActionError::Clipboard("unused".into()))
        }
    }

    #[derive(Default)]
    struct FakeSurface {
        calls: RefCell<Vec<&'static str>>,
    }

    impl MaskSurface for FakeSurface {
        fn hide_mask(&self) {
            self.calls.borrow_mut().push("hide");
        }
        fn restore_mask(&self) {
            self.calls.borrow_mut().push("restore");
        }
    }

    fn controller() -> SelectionController {
        SelectionController::new(Size::new(1920, 1080), 1.0)
    }

    fn drag(c: &mut SelectionController, from: (i32, i32), to: (i32, i32)) {
        c.begin(Point::new(from.0, from.1));
        c.update(Point::new(to.0, to.1));
    }

    #[test]
    fn begin_starts_zero_size_rect() {
        let mut c = controller();
        let view = c.begin(Point::new(30, 40));
        assert_eq!(view.selection, Some(Rect::new(30, 40, 0, 0)));
        assert_eq!(view.phase, Phase::Selecting);
        assert!(view.affordance.is_none());
    }

    #[test]
    fn update_without_drag_is_noop() {
        let mut c = controller();
        let view = c.update(Point::new(10, 10));
        assert!(view.selection.is_none());
        assert_eq!(view.phase, Phase::Open);
    }

    #[test]
    fn update_normalizes_each_axis() {
        let mut c = controller();
        c.begin(Point::new(100, 100));

        let first = c.update(Point::new(40, 60));
        assert_eq!(first.selection, Some(Rect::new(40, 60, 60, 40)));

        let second = c.update(Point::new(40, 160));
        assert_eq!(second.selection, Some(Rect::new(40, 100, 60, 60)));
        assert!(second.affordance.is_some());
    }

    #[test]
    fn end_with_zero_width_discards_without_capture() {
        let mut c = controller();
        let capture = FakeCapture::default();
        let surface = FakeSurface::default();
        drag(&mut c, (50, 50), (50, 90));

        assert_eq!(c.end(&capture, &surface), EndOutcome::Discarded);
        assert!(capture.requests.borrow().is_empty());
        assert!(surface.calls.borrow().is_empty());
        assert_eq!(c.phase(), Phase::Open);
    }

    #[test]
    fn end_without_drag_is_idle() {
        let mut c = controller();
        let capture = FakeCapture::default();
        assert_eq!(c.end(&capture, &FakeSurface::default()), EndOutcome::Idle);
    }

    #[test]
    fn end_captures_with_mask_hidden() {
        let mut c = controller();
        let capture = FakeCapture::default();
        let surface = FakeSurface::default();
        drag(&mut c, (10, 10), (110, 60));

        assert_eq!(c.end(&capture, &surface), EndOutcome::Captured(16));
        assert_eq!(capture.requests.borrow().as_slice(), &[Rect::new(10, 10, 100, 50)]);
        assert_eq!(surface.calls.borrow().as_slice(), &["hide", "restore"]);

        let view = c.view();
        assert!(view.mask_visible);
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.selection, Some(Rect::new(10, 10, 100, 50)));
    }

    #[test]
    fn capture_uses_physical_pixels() {
        let mut c = SelectionController::new(Size::new(960, 540), 2.0);
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());
        assert_eq!(capture.requests.borrow().as_slice(), &[Rect::new(20, 20, 200, 100)]);
    }

    #[test]
    fn failed_capture_leaves_no_buffer_and_clears_drag() {
        let mut c = controller();
        let capture = FakeCapture {
            fail: true,
            ..Default::default()
        };
        let surface = FakeSurface::default();
        drag(&mut c, (10, 10), (110, 60));

        assert!(matches!(c.end(&capture, &surface), EndOutcome::Failed(_)));
        assert_eq!(surface.calls.borrow().as_slice(), &["hide", "restore"]);
        assert!(!c.has_buffer());
        assert_eq!(c.phase(), Phase::Open);
        assert!(c.copy_requested(&capture).is_none());
    }

    #[test]
    fn failed_recapture_keeps_earlier_buffer() {
        let mut c = controller();
        let working = FakeCapture::default();
        let failing = FakeCapture {
            fail: true,
            ..Default::default()
        };
        drag(&mut c, (10, 10), (110, 60));
        assert_eq!(c.end(&working, &FakeSurface::default()), EndOutcome::Captured(16));

        drag(&mut c, (500, 500), (400, 450));
        assert!(matches!(c.end(&failing, &FakeSurface::default()), EndOutcome::Failed(_)));

        assert!(c.has_buffer());
        assert_eq!(c.phase(), Phase::Ready);
        assert_eq!(c.selection(), Some(Rect::new(10, 10, 100, 50)));
        assert!(matches!(c.copy_requested(&working), Some(ActionOutcome::Copied)));
        assert_eq!(working.copies.get(), 1);
    }

    #[test]
    fn press_on_buttons_does_not_start_a_drag() {
        let mut c = controller();
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());

        let buttons = c.view().affordance.unwrap();
        let view = c.begin(Point::new(buttons.x + 2, buttons.y + 2));

        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.selection, Some(Rect::new(10, 10, 100, 50)));
    }

    #[test]
    fn new_capture_replaces_buffer() {
        let mut c = controller();
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());
        drag(&mut c, (500, 500), (400, 450));
        c.end(&capture, &FakeSurface::default());

        assert_eq!(c.selection(), Some(Rect::new(400, 450, 100, 50)));
        assert_eq!(capture.requests.borrow().len(), 2);
    }

    #[test]
    fn copy_twice_is_noop_the_second_time() {
        let mut c = controller();
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());

        assert!(matches!(c.copy_requested(&capture), Some(ActionOutcome::Copied)));
        assert!(c.copy_requested(&capture).is_none());
        assert_eq!(capture.copies.get(), 1);
    }

    #[test]
    fn save_consumes_buffer_even_on_failure() {
        let mut c = controller();
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());

        assert!(matches!(c.save_requested(&capture), Some(ActionOutcome::Failed(_))));
        assert!(c.save_requested(&capture).is_none());
        assert_eq!(capture.saves.get(), 1);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut c = controller();
        let capture = FakeCapture::default();
        drag(&mut c, (10, 10), (110, 60));
        c.end(&capture, &FakeSurface::default());
        c.begin(Point::new(300, 300));

        c.cancel_requested();

        assert_eq!(c.phase(), Phase::Open);
        assert!(c.selection().is_none());
    }
}
