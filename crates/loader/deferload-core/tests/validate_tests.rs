use deferload_core::{validate, Config, ConfigError};

fn with(f: impl FnOnce(&mut Config)) -> Config {
    let mut cfg = Config::default();
    f(&mut cfg);
    cfg
}

#[test]
fn every_empty_string_option_is_rejected_by_name() {
    let cases: [(&str, Config); 5] = [
        ("selector", with(|c| c.selector = String::new())),
        ("loaded_class", with(|c| c.loaded_class = String::new())),
        ("error_class", with(|c| c.error_class = String::new())),
        ("root", with(|c| c.root = Some(String::new()))),
        ("root_margin", with(|c| c.root_margin = String::new())),
    ];
    for (field, cfg) in cases {
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err, ConfigError::EmptyString { field });
        assert_eq!(err.field(), field);
    }
}

#[test]
fn non_empty_strings_pass() {
    let cfg = with(|c| {
        c.selector = "img.lazy".into();
        c.root = Some("#scroller".into());
        c.root_margin = "10px 20px".into();
    });
    assert!(validate(&cfg).is_ok());
}

#[test]
fn absent_root_is_valid() {
    assert!(validate(&with(|c| c.root = None)).is_ok());
}

#[test]
fn threshold_endpoints_are_inclusive() {
    for t in [0.0, 0.25, 0.5, 1.0] {
        assert!(validate(&with(|c| c.threshold = t)).is_ok(), "t={t}");
    }
}

#[test]
fn threshold_outside_unit_interval_is_rejected() {
    for t in [-0.1, 1.1, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let err = validate(&with(|c| c.threshold = t)).unwrap_err();
        assert!(
            matches!(err, ConfigError::ThresholdOutOfRange { .. }),
            "t={t}"
        );
    }
}

#[test]
fn config_round_trips_through_json_with_defaults() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.selector, ".deferred");
    assert_eq!(cfg.threshold, 0.0);
    assert!(cfg.root.is_none());

    let cfg: Config = serde_json::from_str(r#"{"selector": ".lazy", "threshold": 0.5}"#).unwrap();
    assert_eq!(cfg.selector, ".lazy");
    assert_eq!(cfg.threshold, 0.5);
    assert_eq!(cfg.loaded_class, "loaded");
}
