//! Selection geometry — points, sizes, and drag-normalized rectangles.
//!
//! Pure value types. Coordinates are overlay pixels with the origin at the
//! top-left of the primary display.

use serde::{Deserialize, Serialize};

/// A pointer position in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of a screen or raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle whose `(x, y)` is always the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle spanned by a drag from `start` to `current`.
    ///
    /// Each axis is normalized on its own: when the pointer sits left of (or
    /// above) the start, the origin moves to the pointer and the extent is
    /// mirrored to positive.
    pub fn from_drag(start: Point, current: Point) -> Self {
        let (x, width) = span(start.x, current.x);
        let (y, height) = span(start.y, current.y);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when either dimension is zero. Such a rectangle selects nothing.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        px >= i64::from(self.x) && px < self.right() && py >= i64::from(self.y) && py < self.bottom()
    }

    /// Scales logical coordinates to physical pixels.
    ///
    /// Edges are rounded independently so adjacent rectangles stay adjacent.
    pub fn scaled(&self, factor: f64) -> Self {
        if factor == 1.0 {
            return *self;
        }
        let left = (f64::from(self.x) * factor).round() as i64;
        let top = (f64::from(self.y) * factor).round() as i64;
        let right = (self.right() as f64 * factor).round() as i64;
        let bottom = (self.bottom() as f64 * factor).round() as i64;
        Self {
            x: left as i32,
            y: top as i32,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    /// Whether any part of the rectangle falls outside `bounds`.
    pub fn exceeds(&self, bounds: Size) -> bool {
        self.x < 0
            || self.y < 0
            || self.right() > i64::from(bounds.width)
            || self.bottom() > i64::from(bounds.height)
    }

    /// Intersection with the `bounds` area anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle lies inside.
    pub fn clamp_to(&self, bounds: Size) -> Option<Self> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = self.right().min(i64::from(bounds.width));
        let bottom = self.bottom().min(i64::from(bounds.height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: left as i32,
            y: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Origin and extent along one axis of a drag.
fn span(start: i32, current: i32) -> (i32, u32) {
    let delta = i64::from(current) - i64::from(start);
    if delta < 0 {
        (current, delta.unsigned_abs() as u32)
    } else {
        (start, delta as u32)
    }
}
