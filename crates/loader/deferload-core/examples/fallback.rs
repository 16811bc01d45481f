//! Demonstrates the capability-fallback path: with no visibility primitive,
//! `init` loads every eligible element immediately instead of watching.
//!
//! Run: cargo run -p deferload-core --example fallback

use deferload_core::{Config, Controller, Hooks};
use deferload_test_dom::{ElementId, FakeDom, FakeWatcher};

fn main() {
    let mut dom = FakeDom::without_visibility();
    let hero = dom.add_deferred_image(".deferred", "hero.jpg");
    dom.add_deferred_image(".deferred", "gallery-1.jpg");

    let hooks = Hooks::none().on_loaded(|e: &ElementId| println!("loaded element #{e}"));
    let mut ctl: Controller<ElementId, FakeWatcher> = Controller::new(Config::default(), hooks);

    ctl.init(&mut dom).expect("default config is valid");
    println!(
        "watcher created: {}, probes issued: {}",
        ctl.is_watching(),
        dom.pending_probes.len()
    );

    // Stand in for the event loop: settle each probe as a success.
    while let Some((element, request)) = dom.take_probe() {
        println!("probe for #{element}: {:?}", request.src);
        ctl.probe_settled(&mut dom, &element, Ok(()));
    }

    println!("hero classes: {:?}", dom.classes(hero));
}
