//! Widget options, as passed by the embedding page.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, CropResult};
use crate::geometry::{InsetRect, DEFAULT_INSET};
use crate::handle::HandleCount;

/// Visual shape of the crop frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Plain rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the frame (a circle when the frame is square).
    Ellipse,
}

/// Construction options for a crop widget.
///
/// Field names follow the JavaScript options object (`forceAspect`,
/// `noTouchScroll`, ...). The frame-change callback is supplied
/// separately when the widget is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CropOptions {
    /// Frame shape.
    pub shape: Shape,
    /// Legacy switch: `circle: true` selects [`Shape::Ellipse`].
    pub circle: bool,
    /// Initial top inset (default 100).
    pub top: Option<f64>,
    /// Initial left inset (default 100).
    pub left: Option<f64>,
    /// Initial bottom inset (default 100).
    pub bottom: Option<f64>,
    /// Initial right inset (default 100).
    pub right: Option<f64>,
    /// Lock the frame to this width/height ratio.
    pub force_aspect: Option<f64>,
    /// Number of resize handles.
    pub handles: HandleCount,
    /// Element sizes are unknown at construction; derive the frame from
    /// the bounds on the first bounds change instead.
    pub no_initial_bounds: bool,
    /// Treat a single-finger touch as a frame drag instead of page scroll.
    pub no_touch_scroll: bool,
    /// Show the two-finger instruction overlay on touch devices.
    pub show_help: bool,
}

impl CropOptions {
    /// Parse options from JSON and validate them.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the options are invalid.
    pub fn from_json(json: &str) -> CropResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check values serde cannot rule out on its own.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidAspect`] for a non-positive or non-finite
    /// aspect ratio, and [`CropError::InvalidOptions`] for non-finite insets.
    pub fn validate(&self) -> CropResult<()> {
        if let Some(aspect) = self.force_aspect {
            if !(aspect.is_finite() && aspect > 0.0) {
                return Err(CropError::InvalidAspect(aspect));
            }
        }

        if !self.initial_rect().is_finite() {
            return Err(CropError::InvalidOptions(
                "initial insets must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Shape after applying the legacy `circle` switch.
    #[must_use]
    pub fn resolved_shape(&self) -> Shape {
        if self.circle {
            Shape::Ellipse
        } else {
            self.shape
        }
    }

    /// Initial frame, with unset edges at the default inset.
    #[must_use]
    pub fn initial_rect(&self) -> InsetRect {
        InsetRect::new(
            self.top.unwrap_or(DEFAULT_INSET),
            self.left.unwrap_or(DEFAULT_INSET),
            self.bottom.unwrap_or(DEFAULT_INSET),
            self.right.unwrap_or(DEFAULT_INSET),
        )
    }

    /// Set the initial frame.
    #[must_use]
    pub fn with_initial(mut self, rect: InsetRect) -> Self {
        self.top = Some(rect.top);
        self.left = Some(rect.left);
        self.bottom = Some(rect.bottom);
        self.right = Some(rect.right);
        self
    }

    /// Lock the aspect ratio.
    #[must_use]
    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.force_aspect = Some(aspect);
        self
    }

    /// Set the handle count.
    #[must_use]
    pub fn with_handles(mut self, handles: HandleCount) -> Self {
        self.handles = handles;
        self
    }

    /// Set the frame shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Defer the frame until the first bounds change.
    #[must_use]
    pub fn with_no_initial_bounds(mut self, value: bool) -> Self {
        self.no_initial_bounds = value;
        self
    }

    /// Let single-finger touches drag the frame.
    #[must_use]
    pub fn with_no_touch_scroll(mut self, value: bool) -> Self {
        self.no_touch_scroll = value;
        self
    }
}
