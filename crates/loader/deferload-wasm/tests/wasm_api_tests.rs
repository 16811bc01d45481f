#![cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use deferload_wasm::{abi_version, DeferLoad};
use js_sys::{Object, Reflect};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let obj = Object::new();
    for (key, value) in entries {
        Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
    }
    obj.into()
}

fn body() -> Element {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .body()
        .unwrap()
        .into()
}

fn append_deferred(class: &str, src: Option<&str>) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("img").unwrap();
    el.set_class_name(class);
    if let Some(src) = src {
        el.set_attribute("data-src", src).unwrap();
    }
    body().append_child(&el).unwrap();
    el
}

fn clear_body() {
    body().set_inner_html("");
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(DeferLoad::new(JsValue::UNDEFINED).is_ok());
    assert!(DeferLoad::new(JsValue::NULL).is_ok());
}

#[wasm_bindgen_test]
fn wrongly_typed_option_fails_at_construction() {
    let opts = options(&[("selector", JsValue::from_f64(42.0))]);
    assert!(DeferLoad::new(opts).is_err());
}

#[wasm_bindgen_test]
fn non_function_callback_fails_at_construction() {
    let opts = options(&[("loaded", JsValue::from_str("not a function"))]);
    assert!(DeferLoad::new(opts).is_err());
}

#[wasm_bindgen_test]
fn invalid_threshold_fails_at_init_not_construction() {
    let opts = options(&[("threshold", JsValue::from_f64(1.5))]);
    let ctl = DeferLoad::new(opts).unwrap();
    assert!(ctl.init().is_err());
    assert!(!ctl.is_watching());
}

#[wasm_bindgen_test]
fn empty_selector_fails_at_init() {
    let opts = options(&[("selector", JsValue::from_str(""))]);
    let ctl = DeferLoad::new(opts).unwrap();
    assert!(ctl.init().is_err());
}

#[wasm_bindgen_test]
fn init_observes_eligible_elements() {
    clear_body();
    append_deferred("deferred", Some("probe-a.jpg"));
    append_deferred("deferred", Some("probe-b.jpg"));
    // Matches the selector but carries no deferred reference: not eligible.
    append_deferred("deferred", None);

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.init().unwrap();
    assert!(ctl.is_watching());
    assert_eq!(ctl.pending(), 2);

    ctl.destroy();
    assert!(!ctl.is_watching());
    assert_eq!(ctl.pending(), 0);
}

#[wasm_bindgen_test]
fn destroy_is_idempotent() {
    clear_body();
    append_deferred("deferred", Some("probe.jpg"));

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.init().unwrap();
    ctl.destroy();
    ctl.destroy();
    assert_eq!(ctl.pending(), 0);
}

#[wasm_bindgen_test]
fn update_before_init_is_a_no_op() {
    clear_body();
    append_deferred("deferred", Some("probe.jpg"));

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.update().unwrap();
    assert!(!ctl.is_watching());
    assert_eq!(ctl.pending(), 0);
}

#[wasm_bindgen_test]
fn update_tracks_elements_added_after_init() {
    clear_body();
    append_deferred("deferred", Some("probe-a.jpg"));

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.init().unwrap();
    assert_eq!(ctl.pending(), 1);

    append_deferred("deferred", Some("probe-b.jpg"));
    ctl.update().unwrap();
    assert_eq!(ctl.pending(), 2);
}

#[wasm_bindgen_test]
fn trigger_load_without_references_marks_error_synchronously() {
    clear_body();
    let el = append_deferred("deferred", None);

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.trigger_load(el.clone());

    assert!(el.class_list().contains("load-error"));
    assert!(el.get_attribute("data-src").is_none());
}

#[wasm_bindgen_test]
fn trigger_load_with_reference_never_settles_synchronously() {
    clear_body();
    let el = append_deferred("deferred", Some("probe.jpg"));

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    // The probe is dispatched while `trigger_load` holds the controller
    // state; its outcome must only arrive on a later event-loop turn.
    ctl.trigger_load(el.clone());

    assert_eq!(el.get_attribute("data-src").as_deref(), Some("probe.jpg"));
    assert!(!el.class_list().contains("loaded"));
    assert!(!el.class_list().contains("load-error"));
}

#[wasm_bindgen_test]
fn reinit_after_destroy_rescans() {
    clear_body();
    append_deferred("deferred", Some("probe.jpg"));

    let ctl = DeferLoad::new(JsValue::UNDEFINED).unwrap();
    ctl.init().unwrap();
    ctl.destroy();
    ctl.init().unwrap();
    assert!(ctl.is_watching());
    assert_eq!(ctl.pending(), 1);
}
