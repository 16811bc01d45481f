//! Controller configuration.

use serde::{Deserialize, Serialize};

/// Attribute holding the deferred primary resource reference.
pub const ATTR_DEFERRED_SRC: &str = "data-src";
/// Attribute holding the deferred responsive resource set.
pub const ATTR_DEFERRED_SRCSET: &str = "data-srcset";
/// Attribute the primary resource reference is applied to on success.
pub const ATTR_SRC: &str = "src";
/// Attribute the responsive resource set is applied to on success.
pub const ATTR_SRCSET: &str = "srcset";

/// User-supplied options, immutable once the controller is constructed.
/// Success/failure callbacks are not data and live in [`crate::Hooks`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selector matched against the document to find candidate elements.
    pub selector: String,

    /// Class added to an element once its resource has been applied.
    pub loaded_class: String,

    /// Class added to an element whose load failed.
    pub error_class: String,

    /// Selector of the container the visibility region is measured against.
    /// `None` means the viewport.
    pub root: Option<String>,

    /// Margin descriptor (CSS-margin-like) expanding the visibility region.
    pub root_margin: String,

    /// Fraction of the element that must be visible, in [0, 1].
    pub threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selector: ".deferred".to_string(),
            loaded_class: "loaded".to_string(),
            error_class: "load-error".to_string(),
            root: None,
            root_margin: "0px".to_string(),
            threshold: 0.0,
        }
    }
}
