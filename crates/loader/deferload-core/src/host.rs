//! Host collaborator traits.
//!
//! The document model and the visibility-notification primitive are external
//! collaborators. The controller only needs: "find elements matching a
//! descriptor", "read/write an element's attributes and class list", a
//! capability probe for the visibility primitive, and a way to start an
//! asynchronous fetch probe. Adapters implement [`DocumentHost`]; probe
//! completion is delivered back through
//! [`Controller::probe_settled`](crate::Controller::probe_settled) on the
//! host's event loop.

use serde::{Deserialize, Serialize};

/// Options the watcher is constructed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Selector of the root container, `None` for the viewport.
    pub root: Option<String>,
    /// CSS-margin-like descriptor expanding the visibility region.
    pub root_margin: String,
    /// Visible fraction required to count as intersecting, in [0, 1].
    pub threshold: f32,
}

/// Resource references read off an element, handed to the host's fetch probe.
/// At least one of the two is present when a probe is started.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub src: Option<String>,
    pub srcset: Option<String>,
}

/// One live watcher instance. `unobserve` and `disconnect` are idempotent;
/// `disconnect` is safe to call on a watcher that never observed anything.
pub trait VisibilityWatcher<E> {
    fn observe(&mut self, element: &E);
    fn unobserve(&mut self, element: &E);
    fn disconnect(&mut self);
}

/// The document-side surface the controller drives.
pub trait DocumentHost {
    type Element: Clone + PartialEq;
    type Watcher: VisibilityWatcher<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&mut self, element: &Self::Element, class: &str);

    /// Whether the environment provides a visibility-notification primitive.
    /// Probed once per `init`; when `false` the controller never constructs
    /// a watcher and loads every eligible element immediately instead.
    fn visibility_supported(&self) -> bool;

    /// Construct the watcher. Only called when `visibility_supported()`.
    fn create_watcher(&mut self, options: &WatchOptions) -> Self::Watcher;

    /// Start the asynchronous fetch probe for one element. The host reports
    /// completion via `Controller::probe_settled`; once started, a probe
    /// always settles, there is no cancellation.
    fn start_probe(&mut self, element: &Self::Element, request: ProbeRequest);
}
