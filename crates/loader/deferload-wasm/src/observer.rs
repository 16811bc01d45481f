//! `IntersectionObserver` watcher adapter.

use std::cell::RefCell;
use std::rc::Weak;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use deferload_core::{VisibilityWatcher, WatchOptions};

use crate::State;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// One live `IntersectionObserver` plus the callback closure keeping it
/// callable. `observer` is `None` when construction failed (e.g. a margin
/// descriptor the browser rejects); the watcher then degrades to a no-op and
/// the error is reported on the console.
pub(crate) struct ObserverWatcher {
    observer: Option<IntersectionObserver>,
    _callback: ObserverCallback,
}

impl ObserverWatcher {
    pub(crate) fn create(
        document: &Document,
        state: Weak<RefCell<State>>,
        options: &WatchOptions,
    ) -> Self {
        let callback: ObserverCallback =
            Closure::new(move |entries: js_sys::Array, _obs: IntersectionObserver| {
                let Some(state) = state.upgrade() else {
                    return;
                };
                let batch: Vec<(Element, bool)> = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|e| (e.target(), e.is_intersecting()))
                    .collect();
                let st = &mut *state.borrow_mut();
                st.controller.visibility_batch(&mut st.dom, &batch);
            });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(f64::from(options.threshold)));
        if let Some(selector) = &options.root {
            if let Ok(Some(root)) = document.query_selector(selector) {
                init.set_root(Some(&root));
            }
        }

        let observer = match IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => Some(observer),
            Err(e) => {
                web_sys::console::error_2(
                    &JsValue::from_str("deferload: IntersectionObserver rejected options:"),
                    &e,
                );
                None
            }
        };

        Self {
            observer,
            _callback: callback,
        }
    }
}

impl VisibilityWatcher<Element> for ObserverWatcher {
    fn observe(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.observe(element);
        }
    }

    fn unobserve(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.unobserve(element);
        }
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}
