//! # Crop Circle WASM Binding
//!
//! This crate attaches the crop frame from `crop-core` to DOM elements,
//! wiring mouse, touch, resize and mutation events into the widget.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web crop-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { CropCircle } from './pkg/crop_app.js';
//!
//! await init();
//! const crop = new CropCircle(
//!     document.getElementById('photo-box'),
//!     JSON.stringify({ shape: 'ellipse', forceAspect: 1, handles: 4 }),
//!     null,
//!     (rect) => console.log(rect.width, rect.height),
//! );
//!
//! // later
//! crop.remove();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod dom;
mod listener;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crop_core::{
    style, CropOptions, CropWidget, FrameChange, HitTarget, InputEvent, Point, Size, TouchPhase,
};
use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, MouseEvent, MutationObserver, MutationObserverInit,
    Window,
};

use crate::dom::DomHost;
use crate::listener::Listener;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Crop Circle WASM initialized");
}

/// Widget state shared between [`CropCircle`] and its DOM callbacks.
struct Attached {
    widget: RefCell<CropWidget<DomHost>>,
    detached: Cell<bool>,
    last_change: Rc<Cell<Option<FrameChange>>>,
}

impl Attached {
    /// Tear the widget down, or leave it to the borrow holder if it is busy.
    fn finish_removal(&self) {
        if let Ok(mut widget) = self.widget.try_borrow_mut() {
            widget.remove();
        } else {
            tracing::debug!("Crop widget busy, deferring removal");
        }
    }
}

type WidgetHandle = Rc<Attached>;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Run `f` on the widget unless it is detached or already borrowed.
///
/// Observer callbacks run inside widget operations; events they trigger
/// synchronously are dropped instead of panicking on the borrow. A removal
/// requested while `f` ran completes once the borrow is released.
fn with_widget<R>(
    shared: &Attached,
    f: impl FnOnce(&mut CropWidget<DomHost>) -> R,
) -> Option<R> {
    if shared.detached.get() {
        return None;
    }
    let result = if let Ok(mut widget) = shared.widget.try_borrow_mut() {
        f(&mut widget)
    } else {
        tracing::warn!("Crop widget busy, dropping re-entrant event");
        return None;
    };
    if shared.detached.get() {
        shared.finish_removal();
    }
    Some(result)
}

/// Feed an event and suppress its default action if the widget used it.
fn dispatch(widget: &WidgetHandle, dom_event: &Event, input: &InputEvent) {
    if with_widget(widget, |w| w.handle_event(input)).unwrap_or(false) {
        dom_event.prevent_default();
    }
}

/// Cache every frame change, then hand it to the JS callback if any.
fn frame_observer(
    last_change: Rc<Cell<Option<FrameChange>>>,
    callback: Option<Function>,
) -> impl FnMut(&FrameChange) + 'static {
    move |change: &FrameChange| {
        last_change.set(Some(*change));
        let Some(callback) = &callback else {
            return;
        };
        let value = match serde_json::to_string(change) {
            Ok(json) => js_sys::JSON::parse(&json),
            Err(err) => {
                tracing::warn!("Failed to serialize frame change: {}", err);
                return;
            }
        };
        let result = value.and_then(|value| callback.call1(&JsValue::NULL, &value));
        if let Err(err) = result {
            tracing::warn!("onFrameChanged callback failed: {:?}", err);
        }
    }
}

fn create_div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    element.set_class_name(class);
    Ok(element)
}

fn is_touch_device(document: &Document) -> bool {
    document
        .document_element()
        .and_then(|root| js_sys::Reflect::has(&root, &JsValue::from_str("ontouchstart")).ok())
        .unwrap_or(false)
}

/// A crop frame attached to a container element.
#[wasm_bindgen]
pub struct CropCircle {
    shared: WidgetHandle,
    listeners: Vec<Listener>,
    observer: Option<MutationObserver>,
    // Owned so the browser can keep calling them until drop.
    _mutation_callback: Option<Closure<dyn FnMut(Array)>>,
    _frame_callback: Option<Closure<dyn FnMut(f64)>>,
    nodes: Vec<Element>,
}

#[wasm_bindgen]
impl CropCircle {
    /// Attach a crop frame to `container`.
    ///
    /// `options_json` holds the widget options (camelCase keys). Bounds come
    /// from `image` when given, otherwise from the container. The optional
    /// `on_frame_changed` callback receives `{top, left, bottom, right,
    /// width, height}` after every change. It may call [`remove`](Self::remove)
    /// or [`frameRect`](Self::frame_rect) on this instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the DOM rejects an
    /// operation.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        container: HtmlElement,
        options_json: &str,
        image: Option<HtmlElement>,
        on_frame_changed: Option<Function>,
    ) -> Result<CropCircle, JsValue> {
        let options = CropOptions::from_json(options_json).map_err(to_js)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No body element"))?;

        let shape = options.resolved_shape();
        let mut nodes: Vec<Element> = Vec::new();

        if is_touch_device(&document) {
            container.class_list().add_1(style::TOUCH_CLASS)?;
            if options.show_help {
                let help = create_div(&document, style::HELP_CLASS)?;
                help.set_text_content(Some(style::help_text(shape).as_str()));
                container.append_child(&help)?;
                nodes.push(help.into());
            }
        }

        let frame = create_div(&document, style::FRAME_CLASS)?;
        dom::set_styles(
            &frame,
            &[
                ("position", "absolute"),
                ("user-select", "none"),
                ("-webkit-user-select", "none"),
            ],
        );
        if let Some(radius) = style::border_radius(shape) {
            dom::set_styles(&frame, &[("border-radius", radius)]);
        }
        dom::set_styles(&container, &[("user-select", "none")]);
        container.append_child(&frame)?;
        nodes.push(frame.clone().into());

        let handles = options.handles.handles();
        let host = DomHost::new(
            window.clone(),
            container.clone(),
            image.clone(),
            frame.clone(),
        );
        let last_change = Rc::new(Cell::new(None));
        let observer = frame_observer(Rc::clone(&last_change), on_frame_changed);
        let widget = CropWidget::with_observer(host, options, observer).map_err(|err| {
            for node in &nodes {
                node.remove();
            }
            to_js(err)
        })?;
        let shared = Rc::new(Attached {
            widget: RefCell::new(widget),
            detached: Cell::new(false),
            last_change,
        });

        let mut crop = CropCircle {
            shared,
            listeners: Vec::new(),
            observer: None,
            _mutation_callback: None,
            _frame_callback: None,
            nodes,
        };

        for &handle in handles {
            let element = create_div(&document, &handle.css_class())?;
            dom::set_styles(&element, &[("position", "absolute")]);
            frame.append_child(&element)?;
            let size = Size::new(
                f64::from(element.offset_width()),
                f64::from(element.offset_height()),
            );
            dom::set_styles(&element, handle.placement(size).as_slice());

            let widget = Rc::clone(&crop.shared);
            let win = window.clone();
            let target = element.clone();
            crop.listen(&element, "mousedown", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                event.stop_propagation();
                event.prevent_default();
                let page = dom::mouse_position(mouse);
                let origin = dom::page_offset(&win, &target);
                let input = InputEvent::PointerDown {
                    x: page.x,
                    y: page.y,
                    button: dom::mouse_button(mouse),
                    target: HitTarget::Handle {
                        handle,
                        offset: Point::new(page.x - origin.x, page.y - origin.y),
                    },
                };
                with_widget(&widget, |w| w.handle_event(&input));
            })?;
        }

        crop.attach_pointer_listeners(&window, &body, &frame)?;
        crop.attach_bounds_watchers(&container, image.as_ref())?;

        Ok(crop)
    }

    /// The current frame as `{top, left, bottom, right, width, height}`.
    ///
    /// Inside `onFrameChanged` the widget is busy, so this returns the change
    /// being delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, or if the widget is busy
    /// before its first notification.
    #[wasm_bindgen(js_name = frameRect)]
    pub fn frame_rect(&self) -> Result<JsValue, JsValue> {
        let change = match self.shared.widget.try_borrow() {
            Ok(widget) => widget.frame_change(),
            Err(err) => self.shared.last_change.get().ok_or_else(|| to_js(err))?,
        };
        let json = serde_json::to_string(&change).map_err(to_js)?;
        js_sys::JSON::parse(&json)
    }

    /// Detach every listener and remove the inserted elements.
    ///
    /// Safe to call more than once, including from `onFrameChanged`. The
    /// closures stay alive until this instance is dropped.
    pub fn remove(&mut self) {
        if self.shared.detached.replace(true) {
            return;
        }
        for listener in &self.listeners {
            listener.detach();
        }
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
        self.shared.finish_removal();

        for node in self.nodes.drain(..) {
            node.remove();
        }
    }
}

impl CropCircle {
    fn listen(
        &mut self,
        target: &web_sys::EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        self.listeners.push(Listener::attach(target, kind, callback)?);
        Ok(())
    }

    fn attach_pointer_listeners(
        &mut self,
        window: &Window,
        body: &HtmlElement,
        frame: &HtmlElement,
    ) -> Result<(), JsValue> {
        let widget = Rc::clone(&self.shared);
        self.listen(frame, "mousedown", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let page = dom::mouse_position(mouse);
                let input = InputEvent::PointerDown {
                    x: page.x,
                    y: page.y,
                    button: dom::mouse_button(mouse),
                    target: HitTarget::Frame,
                };
                dispatch(&widget, &event, &input);
            }
        })?;

        let widget = Rc::clone(&self.shared);
        self.listen(body, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let page = dom::mouse_position(mouse);
                dispatch(&widget, &event, &InputEvent::move_to(page.x, page.y));
            }
        })?;

        let widget = Rc::clone(&self.shared);
        self.listen(body, "mouseup", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let page = dom::mouse_position(mouse);
                dispatch(&widget, &event, &InputEvent::release(page.x, page.y));
            }
        })?;

        // Touch starts keep their default action so taps and scrolling work.
        let widget = Rc::clone(&self.shared);
        self.listen(frame, "touchstart", move |event| {
            if let Some(touch) = event.dyn_ref::<web_sys::TouchEvent>() {
                let input = dom::touch_event(touch, TouchPhase::Start);
                with_widget(&widget, |w| w.handle_event(&input));
            }
        })?;

        let widget = Rc::clone(&self.shared);
        self.listen(body, "touchmove", move |event| {
            if let Some(touch) = event.dyn_ref::<web_sys::TouchEvent>() {
                dispatch(&widget, &event, &dom::touch_event(touch, TouchPhase::Move));
            }
        })?;

        for (kind, phase) in [("touchend", TouchPhase::End), ("touchcancel", TouchPhase::Cancel)] {
            let widget = Rc::clone(&self.shared);
            self.listen(body, kind, move |event| {
                if let Some(touch) = event.dyn_ref::<web_sys::TouchEvent>() {
                    dispatch(&widget, &event, &dom::touch_event(touch, phase));
                }
            })?;
        }

        let widget = Rc::clone(&self.shared);
        self.listen(window, "resize", move |_event| {
            with_widget(&widget, CropWidget::browser_resized);
        })
    }

    fn attach_bounds_watchers(
        &mut self,
        container: &HtmlElement,
        image: Option<&HtmlElement>,
    ) -> Result<(), JsValue> {
        let widget = Rc::clone(&self.shared);
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            with_widget(&widget, |w| {
                if let Some(token) = w.pending_frame() {
                    w.animation_frame(token);
                }
            });
        });
        let callback: Function = on_frame.as_ref().unchecked_ref::<Function>().clone();
        with_widget(&self.shared, |w| w.host_mut().set_frame_callback(callback));
        self._frame_callback = Some(on_frame);

        let widget = Rc::clone(&self.shared);
        let on_mutation = Closure::<dyn FnMut(Array)>::new(move |records: Array| {
            tracing::trace!(records = records.length(), "Observed attribute mutations");
            with_widget(&widget, CropWidget::on_bounds_changed);
        });
        let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        observer.observe_with_options(container, &init)?;
        if let Some(image) = image {
            observer.observe_with_options(image, &init)?;
        }

        tracing::debug!("Crop frame listeners attached");

        self.observer = Some(observer);
        self._mutation_callback = Some(on_mutation);
        Ok(())
    }
}

impl Drop for CropCircle {
    fn drop(&mut self) {
        self.remove();
    }
}
