//! Input events for crop frame interaction.
//!
//! Hosts translate DOM mouse and touch events into these records. All
//! coordinates are page coordinates; the reconciler converts them into the
//! container's space using the container offset at the time of the event.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::handle::Handle;

/// Mouse button number of the primary button.
pub const PRIMARY_BUTTON: u8 = 0;

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in page coordinates.
    pub x: f64,
    /// Y position in page coordinates.
    pub y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event with all touches currently on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitTarget {
    /// The frame body.
    Frame,
    /// A resize handle.
    Handle {
        /// Which handle.
        handle: Handle,
        /// Pointer position relative to the handle element's top-left corner.
        #[serde(default)]
        offset: Point,
    },
    /// Anything else on the page.
    Outside,
}

/// All input events the crop widget reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Mouse button (0 = left, 1 = middle, 2 = right).
        button: u8,
        /// Element under the pointer.
        target: HitTarget,
    },

    /// Mouse moved.
    PointerMove {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Mouse button released.
    PointerUp {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Raw touch event.
    Touch(TouchEvent),
}

impl InputEvent {
    /// Primary-button press on the frame body.
    #[must_use]
    pub const fn press_frame(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PRIMARY_BUTTON,
            target: HitTarget::Frame,
        }
    }

    /// Primary-button press on a handle, grabbed at its top-left corner.
    #[must_use]
    pub const fn press_handle(x: f64, y: f64, handle: Handle) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PRIMARY_BUTTON,
            target: HitTarget::Handle {
                handle,
                offset: Point::new(0.0, 0.0),
            },
        }
    }

    /// Pointer movement.
    #[must_use]
    pub const fn move_to(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    /// Pointer release.
    #[must_use]
    pub const fn release(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    /// Touch event with the given phase and touch positions.
    #[must_use]
    pub fn touch(phase: TouchPhase, points: &[(f64, f64)]) -> Self {
        let touches = points
            .iter()
            .zip(0u32..)
            .map(|(&(x, y), id)| TouchPoint::new(id, x, y))
            .collect();
        Self::Touch(TouchEvent::new(phase, touches))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn touch_helper_numbers_touches() {
        let points = [(1.0, 2.0), (3.0, 4.0)];
        let InputEvent::Touch(touch) = InputEvent::touch(TouchPhase::Start, &points) else {
            panic!("expected touch event");
        };
        assert_eq!(touch.touches.len(), 2);
        assert_eq!(touch.touches[1].id, 1);
        assert_eq!(
            touch.primary_touch().map(TouchPoint::position),
            Some(Point::new(1.0, 2.0))
        );
    }

    #[test]
    fn pointer_event_json_shape() {
        let json = r#"{"type":"pointer_down","data":{"x":5.0,"y":6.0,"button":0,"target":{"kind":"handle","handle":"top_left"}}}"#;
        let event: InputEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event, InputEvent::press_handle(5.0, 6.0, Handle::TopLeft));
    }

    #[test]
    fn touch_event_json_shape() {
        let json = r#"{"type":"touch","data":{"phase":"move","touches":[{"id":0,"x":1.0,"y":1.0}]}}"#;
        let event: InputEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event, InputEvent::touch(TouchPhase::Move, &[(1.0, 1.0)]));
    }
}
