//! Synchronous configuration validation.
//!
//! Runs at the start of `init`/`update`, before any element scanning or
//! watcher creation, so an invalid configuration leaves no partial state.

use crate::config::Config;
use crate::error::ConfigError;

/// Check every user-supplied option. Returns the first offending field.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    non_empty("selector", &cfg.selector)?;
    non_empty("loaded_class", &cfg.loaded_class)?;
    non_empty("error_class", &cfg.error_class)?;
    if let Some(root) = &cfg.root {
        non_empty("root", root)?;
    }
    non_empty("root_margin", &cfg.root_margin)?;

    // NaN fails both comparisons below, so it is rejected along with the
    // out-of-range values.
    if !(cfg.threshold >= 0.0 && cfg.threshold <= 1.0) {
        return Err(ConfigError::ThresholdOutOfRange {
            value: cfg.threshold,
        });
    }
    Ok(())
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        Err(ConfigError::EmptyString { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn first_offending_field_wins() {
        let cfg = Config {
            selector: String::new(),
            loaded_class: String::new(),
            ..Config::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.field(), "selector");
    }
}
