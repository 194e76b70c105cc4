//! Mapping a pointer release to the grid cell under it.
//!
//! The target area can move or resize between renders, so callers pass its current bounds with
//! every query instead of caching them.

use crate::coord::Cell;

/// A position in the same coordinate space as the target area's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// A point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// A rectangle with its top left corner at `(left, top)`.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// `left + width`
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// `top + height`
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `p` lies inside or on the edge of the rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// The cell of a `side` x `side` grid spread over `bounds` that lies under `pointer`.
///
/// Returns `None` outside the bounds. A pointer exactly on the right or bottom edge is inside the
/// bounds but past the last column or row, so it also yields `None`.
///
/// ```rust
/// use jigsaw_lib::coord::Cell;
/// use jigsaw_lib::drop_target::{resolve, Point, Rect};
///
/// let area = Rect::new(0.0, 0.0, 300.0, 300.0);
/// assert_eq!(resolve(Point::new(150.0, 150.0), area, 3), Some(Cell(4)));
/// assert_eq!(resolve(Point::new(300.0, 300.0), area, 3), None);
/// ```
pub fn resolve(pointer: Point, bounds: Rect, side: u32) -> Option<Cell> {
    if side == 0 || bounds.width <= 0.0 || bounds.height <= 0.0 || !bounds.contains(pointer) {
        return None;
    }
    let cell_width = bounds.width / side as f64;
    let cell_height = bounds.height / side as f64;
    let col = ((pointer.x - bounds.left) / cell_width).floor();
    let row = ((pointer.y - bounds.top) / cell_height).floor();
    let side = side as f64;
    if !(0.0..side).contains(&col) || !(0.0..side).contains(&row) {
        return None;
    }
    Some(Cell((row * side + col) as usize))
}
