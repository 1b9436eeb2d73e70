use genome_viewport::api::{DEFAULT_OVERSCAN, DEFAULT_PADDING_X, ViewportConfig};

#[test]
fn defaults_match_documented_values() {
    let config = ViewportConfig::default();

    assert_eq!(config.min_scale, 0.1);
    assert_eq!(config.max_scale, 50.0);
    assert_eq!(config.zoom_step, 1.2);
    assert_eq!(config.padding_x, DEFAULT_PADDING_X);
    assert_eq!(config.fill_ratio, 0.78);
    assert_eq!(config.fallback_scale, 1.0);
    assert_eq!(config.overscan, DEFAULT_OVERSCAN);
    assert_eq!(config.wheel_zoom_sensitivity, 0.0015);
    config.validate().expect("defaults are valid");
}

#[test]
fn json_round_trip_preserves_values() {
    let config = ViewportConfig::default()
        .with_scale_limits(0.5, 20.0)
        .with_zoom_step(1.5)
        .with_overscan(4);

    let json = config.to_json_pretty().expect("serialize");
    let parsed = ViewportConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let parsed = ViewportConfig::from_json_str(r#"{"max_scale": 8.0}"#).expect("parse");

    assert_eq!(parsed.max_scale, 8.0);
    assert_eq!(parsed.min_scale, 0.1);
    assert_eq!(parsed.overscan, 1);
}

#[test]
fn swapped_limits_are_normalized() {
    let config = ViewportConfig::default().with_scale_limits(40.0, 2.0);

    config.validate().expect("swapped limits are accepted");
    let limits = config.scale_limits();
    assert_eq!(limits.min(), 2.0);
    assert_eq!(limits.max(), 40.0);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(ViewportConfig::default().with_zoom_step(0.0).validate().is_err());
    assert!(ViewportConfig::default().with_padding_x(-1.0).validate().is_err());
    assert!(
        ViewportConfig::default()
            .with_scale_limits(f64::NAN, 2.0)
            .validate()
            .is_err()
    );
    assert!(ViewportConfig::from_json_str(r#"{"fill_ratio": -0.5}"#).is_err());
}
