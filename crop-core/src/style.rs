//! Presentation: the CSS the host writes for the frame and its chrome.
//!
//! The frame element is absolutely positioned over the container and
//! carries borders as wide as the container itself. The borders shade
//! everything outside the crop area, so the element's position edges are
//! the frame insets minus the container size.

use serde::{Deserialize, Serialize};

use crate::config::Shape;
use crate::geometry::{InsetRect, Size};

/// Class of the frame element.
pub const FRAME_CLASS: &str = "crop-circle-crop-frame";
/// Class of the help overlay.
pub const HELP_CLASS: &str = "crop-circle-help";
/// Class added to the container on touch devices.
pub const TOUCH_CLASS: &str = "crop-circle-touch";

/// Position of the frame element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    /// CSS `top`.
    pub top: f64,
    /// CSS `left`.
    pub left: f64,
    /// CSS `bottom`.
    pub bottom: f64,
    /// CSS `right`.
    pub right: f64,
}

impl FrameStyle {
    /// Style that places the frame's inner edge at `rect`.
    #[must_use]
    pub fn for_frame(rect: InsetRect, container: Size) -> Self {
        Self {
            top: rect.top - container.height,
            left: rect.left - container.width,
            bottom: rect.bottom - container.height,
            right: rect.right - container.width,
        }
    }

    /// `(property, value)` pairs to write.
    #[must_use]
    pub fn declarations(&self) -> [(&'static str, String); 4] {
        [
            ("top", px(self.top)),
            ("bottom", px(self.bottom)),
            ("left", px(self.left)),
            ("right", px(self.right)),
        ]
    }
}

/// Border widths of the frame element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromeStyle {
    /// Top and bottom border width.
    pub vertical: f64,
    /// Left and right border width.
    pub horizontal: f64,
}

impl ChromeStyle {
    /// Borders sized to the container.
    #[must_use]
    pub const fn for_container(container: Size) -> Self {
        Self {
            vertical: container.height,
            horizontal: container.width,
        }
    }

    /// `(property, value)` pairs to write.
    #[must_use]
    pub fn declarations(&self) -> [(&'static str, String); 4] {
        [
            ("border-top-width", px(self.vertical)),
            ("border-bottom-width", px(self.vertical)),
            ("border-left-width", px(self.horizontal)),
            ("border-right-width", px(self.horizontal)),
        ]
    }
}

/// `border-radius` for the shape, if it needs one.
#[must_use]
pub const fn border_radius(shape: Shape) -> Option<&'static str> {
    match shape {
        Shape::Rectangle => None,
        Shape::Ellipse => Some("50%"),
    }
}

/// Instruction shown once on touch devices.
#[must_use]
pub fn help_text(shape: Shape) -> String {
    let noun = match shape {
        Shape::Rectangle => "box",
        Shape::Ellipse => "circle",
    };
    format!("Drag the cropping {noun} with two fingers. Pinch to resize.")
}

fn px(value: f64) -> String {
    format!("{value}px")
}
