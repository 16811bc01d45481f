//! Error taxonomy.
//!
//! `ConfigError` is the only error that reaches the caller; it is returned
//! synchronously by `init`/`update` and is fatal to that call. `LoadError`
//! never escapes the controller: it is recovered into the failure outcome
//! (error class + failure hook) and the element is marked resolved either way.

use thiserror::Error;

/// Invalid user configuration. First offending field wins; validation is not
/// exhaustive-collecting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config field `{field}` must be a non-empty string")]
    EmptyString { field: &'static str },
    #[error("config field `threshold` must be a number in [0, 1], got {value}")]
    ThresholdOutOfRange { value: f32 },
}

impl ConfigError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::EmptyString { field } => field,
            ConfigError::ThresholdOutOfRange { .. } => "threshold",
        }
    }
}

/// Why a single element's load failed. Internal to the loader.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("element carries neither a deferred src nor a deferred srcset")]
    NoSource,
    #[error("resource probe failed: {0}")]
    Probe(String),
}
