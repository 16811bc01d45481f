//! In-memory document host for exercising the deferload controller without a
//! browser. Elements are integer handles into a flat store; watcher activity
//! is recorded into a log the test keeps a handle to; fetch probes queue up
//! so the test settles them explicitly, standing in for the event loop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use deferload_core::{DocumentHost, ProbeRequest, VisibilityWatcher, WatchOptions};

/// Handle to one fake element.
pub type ElementId = usize;

#[derive(Debug, Default, Clone)]
struct ElementState {
    /// Selectors this element matches. A fake for the host's query engine;
    /// selector syntax is out of scope.
    matches: Vec<String>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
}

/// Everything the watcher was asked to do, shared between the [`FakeDom`]
/// that creates watchers and the test that inspects them.
#[derive(Debug, Default)]
pub struct WatchLog {
    /// Every `observe` call, in order.
    pub observed: Vec<ElementId>,
    /// Elements currently observed.
    pub active: Vec<ElementId>,
    /// Number of `disconnect` calls seen.
    pub disconnects: usize,
    /// Options the most recent watcher was created with.
    pub options: Option<WatchOptions>,
}

/// Watcher that records into the shared [`WatchLog`].
#[derive(Debug)]
pub struct FakeWatcher {
    log: Rc<RefCell<WatchLog>>,
}

impl VisibilityWatcher<ElementId> for FakeWatcher {
    fn observe(&mut self, element: &ElementId) {
        let mut log = self.log.borrow_mut();
        log.observed.push(*element);
        if !log.active.contains(element) {
            log.active.push(*element);
        }
    }

    fn unobserve(&mut self, element: &ElementId) {
        self.log.borrow_mut().active.retain(|e| e != element);
    }

    fn disconnect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.active.clear();
        log.disconnects += 1;
    }
}

/// Fake document host.
#[derive(Debug, Default)]
pub struct FakeDom {
    elements: Vec<ElementState>,
    visibility_supported: bool,
    watch_log: Rc<RefCell<WatchLog>>,
    /// Probes started and not yet settled by the test.
    pub pending_probes: Vec<(ElementId, ProbeRequest)>,
}

impl FakeDom {
    /// Host with a working visibility primitive.
    pub fn new() -> Self {
        Self {
            visibility_supported: true,
            ..Self::default()
        }
    }

    /// Host without a visibility primitive (fallback path).
    pub fn without_visibility() -> Self {
        Self::default()
    }

    /// Add an element matching `selector`, with the given attributes.
    pub fn add_element(&mut self, selector: &str, attrs: &[(&str, &str)]) -> ElementId {
        let id = self.elements.len();
        self.elements.push(ElementState {
            matches: vec![selector.to_string()],
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            classes: Vec::new(),
        });
        id
    }

    /// Shorthand: element matching `selector` with a `data-src` reference.
    pub fn add_deferred_image(&mut self, selector: &str, src: &str) -> ElementId {
        self.add_element(selector, &[("data-src", src)])
    }

    pub fn watch_log(&self) -> Rc<RefCell<WatchLog>> {
        Rc::clone(&self.watch_log)
    }

    pub fn attr(&self, element: ElementId, name: &str) -> Option<&str> {
        self.elements[element].attrs.get(name).map(String::as_str)
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        &self.elements[element].classes
    }

    /// Pop the oldest pending probe, if any.
    pub fn take_probe(&mut self) -> Option<(ElementId, ProbeRequest)> {
        if self.pending_probes.is_empty() {
            None
        } else {
            Some(self.pending_probes.remove(0))
        }
    }
}

impl DocumentHost for FakeDom {
    type Element = ElementId;
    type Watcher = FakeWatcher;

    fn query(&self, selector: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches.iter().any(|m| m == selector))
            .map(|(id, _)| id)
            .collect()
    }

    fn attribute(&self, element: &ElementId, name: &str) -> Option<String> {
        self.elements[*element].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, element: &ElementId, name: &str, value: &str) {
        self.elements[*element]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: &ElementId, name: &str) {
        self.elements[*element].attrs.remove(name);
    }

    fn has_class(&self, element: &ElementId, class: &str) -> bool {
        self.elements[*element].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, element: &ElementId, class: &str) {
        self.elements[*element].classes.push(class.to_string());
    }

    fn visibility_supported(&self) -> bool {
        self.visibility_supported
    }

    fn create_watcher(&mut self, options: &WatchOptions) -> FakeWatcher {
        self.watch_log.borrow_mut().options = Some(options.clone());
        FakeWatcher {
            log: Rc::clone(&self.watch_log),
        }
    }

    fn start_probe(&mut self, element: &ElementId, request: ProbeRequest) {
        self.pending_probes.push((*element, request));
    }
}
