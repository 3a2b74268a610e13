//! Inset-space geometry shared by the tracker, solver and widget.

use serde::{Deserialize, Serialize};

/// Inset applied to every edge when options leave it unset.
pub const DEFAULT_INSET: f64 = 100.0;

/// A point in page or container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle stored as distances from the container's edges.
///
/// `top` is measured down from the container's top edge, `bottom` up from
/// its bottom edge, and likewise for `left`/`right`. The frame's width is
/// therefore `container.width - right - left`, which is why every size
/// query takes the container [`Size`] the insets were measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsetRect {
    /// Distance from the container's top edge.
    pub top: f64,
    /// Distance from the container's left edge.
    pub left: f64,
    /// Distance from the container's bottom edge.
    pub bottom: f64,
    /// Distance from the container's right edge.
    pub right: f64,
}

impl InsetRect {
    /// Create a rectangle from its four insets.
    #[must_use]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    #[must_use]
    pub const fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Build the insets of a `width` x `height` frame whose top-left corner
    /// sits at `origin` (container coordinates).
    #[must_use]
    pub fn from_origin(origin: Point, width: f64, height: f64, container: Size) -> Self {
        Self {
            top: origin.y,
            left: origin.x,
            bottom: container.height - origin.y - height,
            right: container.width - origin.x - width,
        }
    }

    /// Frame width inside a container of the given size.
    #[must_use]
    pub fn width(&self, container: Size) -> f64 {
        container.width - self.right - self.left
    }

    /// Frame height inside a container of the given size.
    #[must_use]
    pub fn height(&self, container: Size) -> f64 {
        container.height - self.bottom - self.top
    }

    /// Whether all four insets are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.bottom.is_finite()
            && self.right.is_finite()
    }

    /// Move the rectangle without resizing it.
    ///
    /// Axes with a zero shift are left untouched so their edges keep their
    /// exact bit patterns.
    #[allow(clippy::float_cmp)]
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx != 0.0 {
            self.left += dx;
            self.right -= dx;
        }
        if dy != 0.0 {
            self.top += dy;
            self.bottom -= dy;
        }
    }
}

impl Default for InsetRect {
    fn default() -> Self {
        Self::uniform(DEFAULT_INSET)
    }
}

/// Payload delivered to frame-change observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameChange {
    /// Top inset.
    pub top: f64,
    /// Left inset.
    pub left: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Right inset.
    pub right: f64,
    /// Derived frame width.
    pub width: f64,
    /// Derived frame height.
    pub height: f64,
}

impl FrameChange {
    /// Describe `rect` as seen inside a container of the given size.
    #[must_use]
    pub fn new(rect: InsetRect, container: Size) -> Self {
        Self {
            top: rect.top,
            left: rect.left,
            bottom: rect.bottom,
            right: rect.right,
            width: rect.width(container),
            height: rect.height(container),
        }
    }

    /// The inset rectangle this change describes.
    #[must_use]
    pub const fn rect(&self) -> InsetRect {
        InsetRect::new(self.top, self.left, self.bottom, self.right)
    }
}
