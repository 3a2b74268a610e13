//! Browser implementation of the crop host.

use crop_core::{
    ChromeStyle, CropHost, ElementGeometry, FrameClock, FrameStyle, FrameToken, InputEvent, Point,
    TouchEvent, TouchPhase, TouchPoint,
};
use js_sys::Function;
use web_sys::{Element, HtmlElement, MouseEvent, Window};

/// Attribute carrying the image's EXIF orientation.
const ORIENTATION_ATTRIBUTE: &str = "data-exif-orientation";

/// Reads geometry from and writes styles to real DOM elements.
pub(crate) struct DomHost {
    window: Window,
    container: HtmlElement,
    image: Option<HtmlElement>,
    frame: HtmlElement,
    frame_callback: Option<Function>,
}

impl DomHost {
    pub(crate) fn new(
        window: Window,
        container: HtmlElement,
        image: Option<HtmlElement>,
        frame: HtmlElement,
    ) -> Self {
        Self {
            window,
            container,
            image,
            frame,
            frame_callback: None,
        }
    }

    /// Function `requestAnimationFrame` should invoke.
    pub(crate) fn set_frame_callback(&mut self, callback: Function) {
        self.frame_callback = Some(callback);
    }

    fn geometry(&self, element: &HtmlElement) -> ElementGeometry {
        let offset = page_offset(&self.window, element);
        let geometry = ElementGeometry::new(
            offset.x,
            offset.y,
            f64::from(element.client_width()),
            f64::from(element.client_height()),
        );

        match element
            .get_attribute(ORIENTATION_ATTRIBUTE)
            .and_then(|value| value.trim().parse::<u8>().ok())
        {
            Some(orientation) => geometry.with_orientation(orientation),
            None => geometry,
        }
    }
}

impl FrameClock for DomHost {
    fn request_frame(&mut self) -> FrameToken {
        // 0 is never handed out by the browser, so it never fires.
        let Some(callback) = &self.frame_callback else {
            tracing::warn!("No animation frame callback installed");
            return FrameToken(0);
        };
        match self.window.request_animation_frame(callback) {
            Ok(id) => FrameToken(id),
            Err(err) => {
                tracing::warn!("requestAnimationFrame failed: {:?}", err);
                FrameToken(0)
            }
        }
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Err(err) = self.window.cancel_animation_frame(token.0) {
            tracing::warn!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}

impl CropHost for DomHost {
    fn container(&self) -> ElementGeometry {
        self.geometry(&self.container)
    }

    fn image(&self) -> Option<ElementGeometry> {
        self.image.as_ref().map(|image| self.geometry(image))
    }

    fn apply_frame_style(&mut self, style: &FrameStyle) {
        set_styles(&self.frame, &style.declarations());
    }

    fn apply_chrome_style(&mut self, chrome: &ChromeStyle) {
        set_styles(&self.frame, &chrome.declarations());
    }
}

/// Write CSS properties, logging the ones the browser rejects.
pub(crate) fn set_styles<S: AsRef<str>>(element: &HtmlElement, declarations: &[(&str, S)]) {
    let style = element.style();
    for (property, value) in declarations {
        if let Err(err) = style.set_property(property, value.as_ref()) {
            tracing::warn!("Failed to set {}: {:?}", property, err);
        }
    }
}

/// Border-box position of `element` in page coordinates.
pub(crate) fn page_offset(window: &Window, element: &Element) -> Point {
    let rect = element.get_bounding_client_rect();
    Point::new(
        rect.left() + window.scroll_x().unwrap_or(0.0),
        rect.top() + window.scroll_y().unwrap_or(0.0),
    )
}

/// Page position of a mouse event.
pub(crate) fn mouse_position(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.page_x()), f64::from(event.page_y()))
}

/// Mouse button of a press, with unknown buttons mapped out of range.
pub(crate) fn mouse_button(event: &MouseEvent) -> u8 {
    u8::try_from(event.button()).unwrap_or(u8::MAX)
}

/// Convert a DOM touch event.
pub(crate) fn touch_event(event: &web_sys::TouchEvent, phase: TouchPhase) -> InputEvent {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|touch| {
            TouchPoint::new(
                touch.identifier().unsigned_abs(),
                f64::from(touch.page_x()),
                f64::from(touch.page_y()),
            )
        })
        .collect();
    InputEvent::Touch(TouchEvent::new(phase, touches))
}
