//! Deferload core (host-agnostic)
//!
//! Visibility-driven deferred loading of media elements. The controller
//! watches eligible elements through a host-provided visibility watcher,
//! issues an asynchronous fetch probe once an element becomes visible, and
//! applies the success/failure outcome back to the element. The document
//! model and the visibility primitive are trait seams; adapters (WASM/DOM)
//! implement them.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod loader;
pub mod outcome;
pub mod validate;

// Re-exports for consumers (adapters)
pub use config::{Config, ATTR_DEFERRED_SRC, ATTR_DEFERRED_SRCSET, ATTR_SRC, ATTR_SRCSET};
pub use controller::Controller;
pub use error::{ConfigError, LoadError};
pub use host::{DocumentHost, ProbeRequest, VisibilityWatcher, WatchOptions};
pub use outcome::{Hooks, LoadOutcome};
pub use validate::validate;
