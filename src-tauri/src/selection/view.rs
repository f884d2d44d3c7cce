//! Overlay view — everything the overlay page draws, derived from the
//! displayed rectangle.
//!
//! Nothing here is stored. The controller rebuilds the view after every
//! event so the mask hole always matches what will be captured.

use super::rect::{Point, Rect, Size};
use serde::Serialize;

/// Width of the Copy/Save button block, in overlay pixels.
pub const AFFORDANCE_WIDTH: u32 = 152;
/// Height of the Copy/Save button block, in overlay pixels.
pub const AFFORDANCE_HEIGHT: u32 = 36;
/// Space between the selection edge and the button block.
pub const AFFORDANCE_GAP: i32 = 6;

/// Where a session is in its lifecycle. A closed overlay has no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Overlay shown, nothing selected yet.
    Open,
    /// A drag is in progress.
    Selecting,
    /// A capture buffer is ready for copy or save.
    Ready,
}

/// Render instructions sent to the overlay page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub phase: Phase,
    pub mask_visible: bool,
    /// CSS `clip-path` for the dimming layer.
    pub clip_path: String,
    /// Outline of the selection, if any.
    pub selection: Option<Rect>,
    /// Top-left of the button block, or `None` while it is hidden.
    pub affordance: Option<Point>,
}

impl OverlayView {
    pub fn derive(screen: Size, selection: Option<Rect>, mask_visible: bool, phase: Phase) -> Self {
        Self {
            phase,
            mask_visible,
            clip_path: clip_path(selection),
            selection,
            affordance: selection.and_then(|rect| affordance_bounds(screen, rect)).map(|b| Point::new(b.x, b.y)),
        }
    }
}

/// Full-screen polygon with the selection cut out.
///
/// The outline walks the screen edge clockwise, then enters along the hole's
/// top edge and traces the hole counter-clockwise, which leaves it unfilled
/// under the nonzero rule.
pub fn clip_path(hole: Option<Rect>) -> String {
    let Some(rect) = hole else {
        return "polygon(0 0, 100% 0, 100% 100%, 0 100%)".to_string();
    };

    let (left, top) = (i64::from(rect.x), i64::from(rect.y));
    let (right, bottom) = (rect.right(), rect.bottom());

    format!(
        "polygon(0 0, 100% 0, 100% 100%, 0 100%, 0 {top}px, \
         {left}px {top}px, {left}px {bottom}px, {right}px {bottom}px, \
         {right}px {top}px, 0 {top}px)"
    )
}

/// Screen area of the Copy/Save block for a selection, if it is shown.
///
/// The block sits outside the top-right corner. When that would run off the
/// right edge it moves inside the selection along its right edge, and it is
/// always kept within the screen.
pub fn affordance_bounds(screen: Size, rect: Rect) -> Option<Rect> {
    if rect.is_empty() {
        return None;
    }

    let max_x = i64::from(screen.width.saturating_sub(AFFORDANCE_WIDTH));
    let max_y = i64::from(screen.height.saturating_sub(AFFORDANCE_HEIGHT));

    let outside = rect.right() + i64::from(AFFORDANCE_GAP);
    let x = if outside <= max_x {
        outside
    } else {
        rect.right() - i64::from(AFFORDANCE_WIDTH) - i64::from(AFFORDANCE_GAP)
    };
    let y = i64::from(rect.y);

    Some(Rect::new(
        x.clamp(0, max_x) as i32,
        y.clamp(0, max_y) as i32,
        AFFORDANCE_WIDTH,
        AFFORDANCE_HEIGHT,
    ))
}
