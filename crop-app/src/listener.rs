//! DOM event subscriptions that can be detached again.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

/// An event listener together with the closure that backs it.
///
/// The closure must outlive the subscription, so it is owned here. Detaching
/// leaves the closure alive because it may be the one currently running.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Subscribe `callback` to `kind` events on `target`.
    pub(crate) fn attach(
        target: &EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    /// Remove the subscription. The closure is released on drop.
    pub(crate) fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to detach {} listener: {:?}", self.kind, err);
        }
    }
}
