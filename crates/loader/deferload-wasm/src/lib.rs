//! Browser interface for deferload.
//!
//! Wraps the host-agnostic controller from `deferload-core` around the real
//! DOM: `IntersectionObserver` as the visibility watcher and a detached
//! `HtmlImageElement` as the fetch probe. The controller and the DOM host
//! share one `Rc<RefCell<..>>` cell; observer callbacks and probe
//! completions hold a `Weak` handle so a dropped `DeferLoad` does not keep
//! the state alive.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use deferload_core::{Config, ConfigError, Controller, Hooks};

mod dom;
mod observer;

use dom::WebDom;
use observer::ObserverWatcher;

pub(crate) struct State {
    controller: Controller<Element, ObserverWatcher>,
    dom: WebDom,
}

pub(crate) type Shared = Rc<RefCell<State>>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn config_err(e: ConfigError) -> JsError {
    JsError::new(&e.to_string())
}

/// Pull an optional function-valued property off the options object.
fn function_prop(options: &JsValue, name: &str) -> Result<Option<Function>, JsError> {
    let value = Reflect::get(options, &JsValue::from_str(name))
        .map_err(|_| JsError::new(&format!("options error: cannot read `{name}`")))?;
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(None);
    }
    value
        .dyn_into::<Function>()
        .map(Some)
        .map_err(|_| JsError::new(&format!("options error: `{name}` must be a function")))
}

fn hook_from(f: Function) -> impl FnMut(&Element) + 'static {
    move |element: &Element| {
        if let Err(e) = f.call1(&JsValue::NULL, element.as_ref()) {
            web_sys::console::error_2(&JsValue::from_str("deferload callback threw:"), &e);
        }
    }
}

/// Split a JS options object into the serde config and the callback hooks.
/// `loaded` / `error` properties are functions and cannot round-trip through
/// serde; everything else deserializes into [`Config`], so a wrongly typed
/// option fails here, before the controller sees it.
fn parse_options(options: JsValue) -> Result<(Config, Hooks<Element>), JsError> {
    if jsvalue_is_undefined_or_null(&options) {
        return Ok((Config::default(), Hooks::none()));
    }

    let mut hooks = Hooks::none();
    if let Some(f) = function_prop(&options, "loaded")? {
        hooks = hooks.on_loaded(hook_from(f));
    }
    if let Some(f) = function_prop(&options, "error")? {
        hooks = hooks.on_error(hook_from(f));
    }

    let cfg: Config =
        swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?;
    Ok((cfg, hooks))
}

#[wasm_bindgen]
pub struct DeferLoad {
    state: Shared,
}

#[wasm_bindgen]
impl DeferLoad {
    /// Create a controller. Pass an options object or undefined/null for
    /// defaults. Example:
    ///   new DeferLoad({ selector: ".lazy", threshold: 0.5, loaded: el => ... })
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<DeferLoad, JsError> {
        console_error_panic_hook::set_once();

        let (cfg, hooks) = parse_options(options)?;
        let dom = WebDom::new()?;
        let state = Rc::new(RefCell::new(State {
            controller: Controller::new(cfg, hooks),
            dom,
        }));
        state.borrow_mut().dom.attach(Rc::downgrade(&state));
        Ok(DeferLoad { state })
    }

    /// Validate the configuration and start observing every eligible
    /// element. Without `IntersectionObserver` support, loads everything
    /// immediately instead. Returns before any load completes.
    pub fn init(&self) -> Result<(), JsError> {
        let st = &mut *self.state.borrow_mut();
        st.controller.init(&mut st.dom).map_err(config_err)
    }

    /// Rescan the document and observe newly eligible elements with the
    /// watcher created by `init`. A no-op when no watcher is active.
    pub fn update(&self) -> Result<(), JsError> {
        let st = &mut *self.state.borrow_mut();
        st.controller.update(&mut st.dom).map_err(config_err)
    }

    /// Stop observing and clear tracked state. Loads already dispatched
    /// still run to completion.
    pub fn destroy(&self) {
        self.state.borrow_mut().controller.destroy();
    }

    /// Load one element right away, bypassing visibility detection.
    #[wasm_bindgen(js_name = triggerLoad)]
    pub fn trigger_load(&self, element: Element) {
        let st = &mut *self.state.borrow_mut();
        st.controller.load(&mut st.dom, element);
    }

    /// Number of elements still waiting for a visibility notification.
    pub fn pending(&self) -> usize {
        self.state.borrow().controller.pending()
    }

    /// Whether an observer is currently active.
    #[wasm_bindgen(js_name = isWatching)]
    pub fn is_watching(&self) -> bool {
        self.state.borrow().controller.is_watching()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
