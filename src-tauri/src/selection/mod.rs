//! Selection domain — drag gestures, rectangle normalization, and the
//! derived overlay view.

mod controller;
mod rect;
mod view;

pub use controller::{EndOutcome, MaskSurface, SelectionController};
pub use rect::{Point, Rect, Size};
pub use view::{
    affordance_bounds, clip_path, OverlayView, Phase, AFFORDANCE_GAP, AFFORDANCE_HEIGHT,
    AFFORDANCE_WIDTH,
};
