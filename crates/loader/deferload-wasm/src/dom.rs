//! `DocumentHost` implementation over the real DOM.
//!
//! Lenient towards the DOM: query or attribute failures degrade to "no
//! elements" / "no attribute" instead of propagating, since unexpected DOM
//! state must not break the controller's bookkeeping.

use std::rc::Weak;

use js_sys::Reflect;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use deferload_core::{DocumentHost, LoadError, ProbeRequest, WatchOptions};

use crate::observer::ObserverWatcher;
use crate::State;

pub(crate) struct WebDom {
    document: Document,
    state: Weak<RefCell<State>>,
}

impl WebDom {
    pub(crate) fn new() -> Result<Self, JsError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("no document in this environment"))?;
        Ok(Self {
            document,
            state: Weak::new(),
        })
    }

    /// Wire the host back to the shared state so observer callbacks and
    /// probe completions can reach the controller.
    pub(crate) fn attach(&mut self, state: Weak<RefCell<State>>) {
        self.state = state;
    }
}

/// Deliver a probe result to the controller, if it is still alive.
fn settle(state: Weak<RefCell<State>>, element: Element, result: Result<(), LoadError>) {
    if let Some(state) = state.upgrade() {
        let st = &mut *state.borrow_mut();
        st.controller.probe_settled(&mut st.dom, &element, result);
    }
}

/// Settle on the next event-loop turn. `start_probe` runs while the caller
/// (init/trigger/observer callback) still holds the state borrow, so a probe
/// that fails before it even starts must not settle synchronously.
fn settle_deferred(state: Weak<RefCell<State>>, element: Element, result: Result<(), LoadError>) {
    let callback = Closure::once_into_js(move || settle(state, element, result));
    if let Some(window) = web_sys::window() {
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
}

impl DocumentHost for WebDom {
    type Element = Element;
    type Watcher = ObserverWatcher;

    fn query(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, element: &Element, name: &str) {
        let _ = element.remove_attribute(name);
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&mut self, element: &Element, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn visibility_supported(&self) -> bool {
        web_sys::window()
            .map(|w| Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn create_watcher(&mut self, options: &WatchOptions) -> ObserverWatcher {
        ObserverWatcher::create(&self.document, self.state.clone(), options)
    }

    /// Probe by loading the resource into a detached image element. The
    /// element's own `src` is only written after the probe confirms the
    /// resource, so a failure never leaves a broken reference behind.
    fn start_probe(&mut self, element: &Element, request: ProbeRequest) {
        let img = match self.document.create_element("img") {
            Ok(el) => el.unchecked_into::<HtmlImageElement>(),
            Err(_) => {
                settle_deferred(
                    self.state.clone(),
                    element.clone(),
                    Err(LoadError::Probe("could not create probe image".into())),
                );
                return;
            }
        };

        let on_load = {
            let state = self.state.clone();
            let element = element.clone();
            Closure::once_into_js(move || settle(state, element, Ok(())))
        };
        let on_error = {
            let state = self.state.clone();
            let element = element.clone();
            Closure::once_into_js(move || {
                settle(
                    state,
                    element,
                    Err(LoadError::Probe("resource failed to load".into())),
                )
            })
        };
        // once_into_js hands ownership to the JS side; whichever handler
        // fires is freed after the call, the other when the image is
        // collected.
        img.set_onload(Some(on_load.unchecked_ref()));
        img.set_onerror(Some(on_error.unchecked_ref()));

        if let Some(srcset) = &request.srcset {
            img.set_srcset(srcset);
        }
        if let Some(src) = &request.src {
            img.set_src(src);
        }
    }
}
