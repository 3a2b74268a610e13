//! Host abstraction: where the widget reads geometry and writes styles.
//!
//! The browser binding implements [`CropHost`] over `web-sys`; tests and
//! the replay tool use [`RecordingHost`], which keeps everything in memory.

use crate::bounds::ElementGeometry;
use crate::scheduler::{FrameClock, FrameToken};
use crate::style::{ChromeStyle, FrameStyle};

/// Environment the crop widget runs in.
pub trait CropHost: FrameClock {
    /// Page offset and size of the container element.
    fn container(&self) -> ElementGeometry;

    /// Page offset, size and orientation of the separate image element,
    /// if bounds come from one.
    fn image(&self) -> Option<ElementGeometry>;

    /// Position the frame element.
    fn apply_frame_style(&mut self, style: &FrameStyle);

    /// Resize the frame's shading borders.
    fn apply_chrome_style(&mut self, chrome: &ChromeStyle);
}

/// In-memory host that records every write and frame request.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    container: ElementGeometry,
    image: Option<ElementGeometry>,
    frame_styles: Vec<FrameStyle>,
    chrome_styles: Vec<ChromeStyle>,
    requested: Vec<FrameToken>,
    cancelled: Vec<FrameToken>,
    next_token: i32,
}

impl RecordingHost {
    /// Host whose container supplies the bounds.
    #[must_use]
    pub fn new(container: ElementGeometry) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    /// Use a separate image element for bounds.
    #[must_use]
    pub fn with_image(mut self, image: ElementGeometry) -> Self {
        self.image = Some(image);
        self
    }

    /// Simulate a layout change of the container.
    pub fn set_container(&mut self, container: ElementGeometry) {
        self.container = container;
    }

    /// Simulate a layout change of the image.
    pub fn set_image(&mut self, image: Option<ElementGeometry>) {
        self.image = image;
    }

    /// Every frame style written so far.
    #[must_use]
    pub fn frame_styles(&self) -> &[FrameStyle] {
        &self.frame_styles
    }

    /// The most recent frame style.
    #[must_use]
    pub fn last_frame_style(&self) -> Option<&FrameStyle> {
        self.frame_styles.last()
    }

    /// Every chrome style written so far.
    #[must_use]
    pub fn chrome_styles(&self) -> &[ChromeStyle] {
        &self.chrome_styles
    }

    /// Tokens handed out, in order.
    #[must_use]
    pub fn requested(&self) -> &[FrameToken] {
        &self.requested
    }

    /// Tokens withdrawn, in order.
    #[must_use]
    pub fn cancelled(&self) -> &[FrameToken] {
        &self.cancelled
    }
}

impl FrameClock for RecordingHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.requested.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }
}

impl CropHost for RecordingHost {
    fn container(&self) -> ElementGeometry {
        self.container
    }

    fn image(&self) -> Option<ElementGeometry> {
        self.image
    }

    fn apply_frame_style(&mut self, style: &FrameStyle) {
        self.frame_styles.push(*style);
    }

    fn apply_chrome_style(&mut self, chrome: &ChromeStyle) {
        self.chrome_styles.push(*chrome);
    }
}
