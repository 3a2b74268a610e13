//! Bounds tracking: where the image sits inside the container.
//!
//! Bounds are recomputed from element geometry every time something
//! changes. Offsets can move for reasons unrelated to the widget (page
//! layout, scrolling, style changes), so nothing here is patched
//! incrementally.

use serde::{Deserialize, Serialize};

use crate::geometry::{InsetRect, Point, Size};

/// EXIF orientations above this value store width and height transposed.
const LAST_UPRIGHT_ORIENTATION: u8 = 4;

/// Page-space geometry of an element, as reported by the host layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementGeometry {
    /// Page offset of the left edge.
    pub left: f64,
    /// Page offset of the top edge.
    pub top: f64,
    /// Laid-out width.
    pub width: f64,
    /// Laid-out height.
    pub height: f64,
    /// EXIF orientation marker (1-8) attached to the element, if any.
    #[serde(default)]
    pub exif_orientation: Option<u8>,
}

impl ElementGeometry {
    /// Create geometry without an orientation marker.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            exif_orientation: None,
        }
    }

    /// Attach an EXIF orientation marker.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: u8) -> Self {
        self.exif_orientation = Some(orientation);
        self
    }

    /// Whether the stored width and height are transposed (EXIF 5-8).
    #[must_use]
    pub fn sideways(&self) -> bool {
        self.exif_orientation.unwrap_or(0) > LAST_UPRIGHT_ORIENTATION
    }

    /// Page offset of the top-left corner.
    #[must_use]
    pub const fn offset(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Laid-out size, ignoring orientation.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Displayed size with orientation applied.
    #[must_use]
    pub fn oriented_size(&self) -> Size {
        if self.sideways() {
            Size::new(self.height, self.width)
        } else {
            self.size()
        }
    }
}

/// The region of the container the crop frame may occupy.
///
/// Edges are insets, like [`InsetRect`]; `width` and `height` are the
/// image's absolute displayed size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Inset of the image's top edge.
    pub top: f64,
    /// Inset of the image's left edge.
    pub left: f64,
    /// Inset of the image's bottom edge.
    pub bottom: f64,
    /// Inset of the image's right edge.
    pub right: f64,
    /// Displayed image width.
    pub width: f64,
    /// Displayed image height.
    pub height: f64,
    /// Whether the image is rotated a quarter turn (width/height swapped).
    pub sideways: bool,
}

impl Bounds {
    /// Compute bounds for `image` inside `container`.
    ///
    /// Without a separate image element the container itself supplies the
    /// bounds, so the offsets are zero and the bounds fill the container.
    #[must_use]
    pub fn compute(container: &ElementGeometry, image: Option<&ElementGeometry>) -> Self {
        let image = image.unwrap_or(container);
        let size = image.oriented_size();
        let top = image.top - container.top;
        let left = image.left - container.left;

        Self {
            top,
            left,
            bottom: container.height - size.height - top,
            right: container.width - size.width - left,
            width: size.width,
            height: size.height,
            sideways: image.sideways(),
        }
    }

    /// The bounds as a frame rectangle.
    #[must_use]
    pub const fn as_rect(&self) -> InsetRect {
        InsetRect::new(self.top, self.left, self.bottom, self.right)
    }

    /// Whether the bounds have no usable area (image not laid out yet).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Largest rectangle of the given aspect ratio that fits, centred.
    ///
    /// A wider image keeps its full height and is centred horizontally; a
    /// taller one keeps its full width and is centred vertically.
    #[must_use]
    pub fn centered_aspect_rect(&self, aspect: f64) -> InsetRect {
        let image_aspect = self.width / self.height;

        if image_aspect > aspect {
            let adjust = (self.width - self.height * aspect) / 2.0;
            InsetRect::new(
                self.top,
                self.left + adjust,
                self.bottom,
                self.right + adjust,
            )
        } else {
            let adjust = (self.height - self.width / aspect) / 2.0;
            InsetRect::new(
                self.top + adjust,
                self.left,
                self.bottom + adjust,
                self.right,
            )
        }
    }

    /// Map `frame`, measured against `previous` bounds, onto these bounds.
    ///
    /// Each inset keeps its distance from the matching image edge, scaled by
    /// how much the image grew on that axis. Returns `None` when the scale
    /// factors are not finite, i.e. the previous bounds had no area.
    #[must_use]
    pub fn rescale(&self, previous: &Self, frame: InsetRect) -> Option<InsetRect> {
        let sx = self.width / previous.width;
        let sy = self.height / previous.height;

        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }

        Some(InsetRect::new(
            self.top + (frame.top - previous.top) * sy,
            self.left + (frame.left - previous.left) * sx,
            self.bottom + (frame.bottom - previous.bottom) * sy,
            self.right + (frame.right - previous.right) * sx,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn container() -> ElementGeometry {
        ElementGeometry::new(10.0, 20.0, 400.0, 300.0)
    }

    #[test]
    fn container_without_image_fills_bounds() {
        let bounds = Bounds::compute(&container(), None);
        assert_eq!(bounds.as_rect(), InsetRect::uniform(0.0));
        assert_eq!(bounds.width, 400.0);
        assert_eq!(bounds.height, 300.0);
        assert!(!bounds.sideways);
    }

    #[test]
    fn image_offset_is_relative_to_container() {
        let image = ElementGeometry::new(60.0, 40.0, 200.0, 150.0);
        let bounds = Bounds::compute(&container(), Some(&image));
        assert_eq!(bounds.top, 20.0);
        assert_eq!(bounds.left, 50.0);
        assert_eq!(bounds.bottom, 130.0);
        assert_eq!(bounds.right, 150.0);
        assert_eq!(bounds.width, 200.0);
        assert_eq!(bounds.height, 150.0);
    }

    #[test]
    fn transposed_orientation_swaps_dimensions() {
        for orientation in 5..=8 {
            let image =
                ElementGeometry::new(10.0, 20.0, 200.0, 100.0).with_orientation(orientation);
            let bounds = Bounds::compute(&container(), Some(&image));
            assert!(bounds.sideways, "orientation {orientation} should be sideways");
            assert_eq!(bounds.width, 100.0);
            assert_eq!(bounds.height, 200.0);
            assert_eq!(bounds.right, 300.0);
            assert_eq!(bounds.bottom, 100.0);
        }
    }

    #[test]
    fn upright_orientations_keep_dimensions() {
        for orientation in 0..=4 {
            let image =
                ElementGeometry::new(10.0, 20.0, 200.0, 100.0).with_orientation(orientation);
            let bounds = Bounds::compute(&container(), Some(&image));
            assert!(!bounds.sideways);
            assert_eq!(bounds.width, 200.0);
        }
    }

    #[test]
    fn orientation_marker_on_container_applies_without_image() {
        let rotated = ElementGeometry::new(0.0, 0.0, 400.0, 300.0).with_orientation(6);
        let bounds = Bounds::compute(&rotated, None);
        assert!(bounds.sideways);
        assert_eq!(bounds.width, 300.0);
        assert_eq!(bounds.height, 400.0);
        assert_eq!(bounds.right, 100.0);
        assert_eq!(bounds.bottom, -100.0);
    }

    #[test]
    fn wide_image_centres_horizontally() {
        let bounds = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 400.0, 200.0), None);
        let rect = bounds.centered_aspect_rect(1.0);
        assert_eq!(rect, InsetRect::new(0.0, 100.0, 0.0, 100.0));
    }

    #[test]
    fn tall_image_centres_vertically() {
        let bounds = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 200.0, 400.0), None);
        let rect = bounds.centered_aspect_rect(2.0);
        assert_eq!(rect, InsetRect::new(150.0, 0.0, 150.0, 0.0));
    }

    #[test]
    fn rescale_doubles_insets_when_bounds_double() {
        let old = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 400.0, 300.0), None);
        let new = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 800.0, 600.0), None);
        let rescaled = new
            .rescale(&old, InsetRect::uniform(50.0))
            .expect("finite scale");
        assert_eq!(rescaled, InsetRect::uniform(100.0));
    }

    #[test]
    fn rescale_from_empty_bounds_is_none() {
        let old = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 0.0, 0.0), None);
        let new = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 800.0, 600.0), None);
        assert!(old.is_degenerate());
        assert!(!new.is_degenerate());
        assert!(new.rescale(&old, InsetRect::uniform(50.0)).is_none());
    }
}
