//! Per-element load steps: reading the deferred references, applying the
//! success/failure outcome. The deferred attributes double as the
//! eligibility marker; stripping them is the terminal "resolved" signal and
//! is performed on both outcomes, so an element is never retried.

use crate::config::{Config, ATTR_DEFERRED_SRC, ATTR_DEFERRED_SRCSET, ATTR_SRC, ATTR_SRCSET};
use crate::host::{DocumentHost, ProbeRequest};

/// An element is eligible while it still carries a deferred reference.
pub fn is_eligible<H: DocumentHost>(host: &H, element: &H::Element) -> bool {
    host.attribute(element, ATTR_DEFERRED_SRC).is_some()
        || host.attribute(element, ATTR_DEFERRED_SRCSET).is_some()
}

/// Read the deferred resource references off an element.
pub fn read_request<H: DocumentHost>(host: &H, element: &H::Element) -> ProbeRequest {
    ProbeRequest {
        src: host.attribute(element, ATTR_DEFERRED_SRC),
        srcset: host.attribute(element, ATTR_DEFERRED_SRCSET),
    }
}

/// Apply a confirmed resource: copy the deferred references into the real
/// attributes, strip the markers, add the loaded class.
pub fn apply_success<H: DocumentHost>(host: &mut H, cfg: &Config, element: &H::Element) {
    if let Some(src) = host.attribute(element, ATTR_DEFERRED_SRC) {
        host.set_attribute(element, ATTR_SRC, &src);
    }
    if let Some(srcset) = host.attribute(element, ATTR_DEFERRED_SRCSET) {
        host.set_attribute(element, ATTR_SRCSET, &srcset);
    }
    strip_markers(host, element);
    if !host.has_class(element, &cfg.loaded_class) {
        host.add_class(element, &cfg.loaded_class);
    }
}

/// Apply a failed load: strip the markers so the element is never retried,
/// add the error class.
pub fn apply_failure<H: DocumentHost>(host: &mut H, cfg: &Config, element: &H::Element) {
    strip_markers(host, element);
    if !host.has_class(element, &cfg.error_class) {
        host.add_class(element, &cfg.error_class);
    }
}

fn strip_markers<H: DocumentHost>(host: &mut H, element: &H::Element) {
    host.remove_attribute(element, ATTR_DEFERRED_SRC);
    host.remove_attribute(element, ATTR_DEFERRED_SRCSET);
}
