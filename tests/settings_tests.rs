//! Settings Tests
//!
//! Tests for:
//! - Defaults of every section
//! - Partial JSON documents and serialization round trips
//! - Validation of cross-field constraints
//! - Style names and colors in JSON

use flythrough::FlythroughError;
use flythrough::resources::{Color, ColorValue};
use flythrough::settings::FlythroughSettings;
use flythrough::style::{ElementStyle, ElementStyleUpdate, VisualStyle};

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn defaults_describe_the_stock_tunnel() {
    let s = FlythroughSettings::default();
    assert_eq!(s.seed, None);
    assert_eq!(s.camera.default_speed, 1000.0);
    assert_eq!(s.camera.loop_duration, 8.0);
    assert_eq!(s.camera.fov, 75.0);
    assert_eq!(s.tube.tubular_segments, 222);
    assert_eq!(s.tube.radial_segments, 16);
    assert_eq!(s.tube.initial.visual_style, VisualStyle::Outline);
    assert_eq!(s.tube.initial.color, ColorValue::Rgb(Color::WHITE));
    assert_eq!(s.elements.initial.count, 150);
    assert_eq!(s.elements.initial.color, ColorValue::Random);
    assert!(s.environment.fog.enabled);
    assert!((s.environment.fog.density - 0.4).abs() < f32::EPSILON);
    assert!(s.environment.bloom.enabled);
    assert!(s.validate().is_ok());
}

#[test]
fn default_environment_has_fog_and_bloom() {
    let env = FlythroughSettings::default().environment.build();
    assert_eq!(env.background, Color::BLACK);
    let fog = env.fog.unwrap();
    assert!(fog.factor(0.0).abs() < 1e-6);
    assert!(fog.factor(10.0) > 0.99);
    assert!((env.bloom.strength - 3.5).abs() < f32::EPSILON);
}

#[test]
fn default_path_is_the_tunnel() {
    let path = FlythroughSettings::default().path.build().unwrap();
    assert_eq!(path.control_points(), flythrough::Path::tunnel().control_points());
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn empty_document_yields_defaults() {
    let s = FlythroughSettings::from_json_str("{}").unwrap();
    assert_eq!(s, FlythroughSettings::default());
}

#[test]
fn partial_document_overrides_only_its_keys() {
    let json = r##"{
        "seed": 7,
        "camera": { "default_speed": 1500.0 },
        "tube": { "initial": { "visual_style": "texturedA", "color": "#ff0000" } },
        "elements": { "initial": { "visual_style": "solid", "color": "random", "count": 300 } },
        "environment": { "fog": { "enabled": false } }
    }"##;
    let s = FlythroughSettings::from_json_str(json).unwrap();

    assert_eq!(s.seed, Some(7));
    assert_eq!(s.camera.default_speed, 1500.0);
    assert_eq!(s.camera.loop_duration, 8.0);
    assert_eq!(s.tube.initial.visual_style, VisualStyle::TexturedA);
    assert_eq!(s.tube.initial.color, ColorValue::Rgb(Color(0xff_00_00)));
    assert!((s.tube.initial.scale - 1.0).abs() < f32::EPSILON);
    assert_eq!(s.elements.initial.count, 300);
    assert_eq!(s.elements.initial.visual_style, VisualStyle::Solid);
    assert!(s.environment.build().fog.is_none());
}

#[test]
fn unknown_style_name_falls_back_to_outline() {
    let json = r#"{ "elements": { "initial": { "visual_style": "neon" } } }"#;
    let s = FlythroughSettings::from_json_str(json).unwrap();
    assert_eq!(s.elements.initial.visual_style, VisualStyle::Outline);
}

#[test]
fn settings_survive_a_round_trip() {
    let mut s = FlythroughSettings::default();
    s.seed = Some(99);
    s.tube.initial.color = ColorValue::Rgb(Color(0x12_34_56));
    s.elements.initial.visual_style = VisualStyle::TexturedB;
    s.path.points = Some(vec![[0.0, 0.0, 0.0], [4.0, 1.0, 0.0], [2.0, 0.0, 3.0]]);

    let json = s.to_json_string().unwrap();
    assert!(json.contains("\"#123456\""));
    assert!(json.contains("\"texturedB\""));
    assert_eq!(FlythroughSettings::from_json_str(&json).unwrap(), s);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = FlythroughSettings::from_json_str("{ \"seed\": ").unwrap_err();
    assert!(matches!(err, FlythroughError::Config(_)));

    let err = FlythroughSettings::from_json_str(r##"{ "tube": { "initial": { "color": "#12" } } }"##).unwrap_err();
    assert!(matches!(err, FlythroughError::Config(_)));
}

#[test]
fn missing_settings_file_is_an_io_error() {
    let err = FlythroughSettings::from_json_file("no/such/settings.json").unwrap_err();
    assert!(matches!(err, FlythroughError::Io(_)));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn validation_rejects_inconsistent_values() {
    let mut s = FlythroughSettings::default();
    s.camera.default_speed = 0.5;
    assert!(s.validate().is_err());

    let mut s = FlythroughSettings::default();
    s.camera.max_speed = 0.5;
    assert!(s.validate().is_err());

    let mut s = FlythroughSettings::default();
    s.camera.near = 10.0;
    s.camera.far = 5.0;
    assert!(s.validate().is_err());

    let mut s = FlythroughSettings::default();
    s.elements.initial.count = s.elements.max_count + 1;
    assert!(s.validate().is_err());

    let mut s = FlythroughSettings::default();
    s.tube.initial.scale = 0.0;
    assert!(s.validate().is_err());
}

#[test]
fn validation_runs_on_parse() {
    let err = FlythroughSettings::from_json_str(r#"{ "camera": { "loop_duration": -1.0 } }"#).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { name: "camera.loop_duration", .. }));
}

#[test]
fn empty_offset_range_is_rejected_before_generation() {
    for json in [
        r#"{ "elements": { "offset_range": [0.2, 0.2] } }"#,
        r#"{ "elements": { "offset_range": [0.6, -0.4] } }"#,
    ] {
        let err = FlythroughSettings::from_json_str(json).unwrap_err();
        assert!(matches!(err, FlythroughError::InvalidParameter { name: "elements.offset_range", .. }));
    }

    let mut s = FlythroughSettings::default();
    s.elements.offset_range = [f32::NEG_INFINITY, 0.6];
    assert!(s.validate().is_err());
}

#[test]
fn negative_progress_jitter_is_rejected() {
    let err = FlythroughSettings::from_json_str(r#"{ "elements": { "progress_jitter": -0.1 } }"#).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { name: "elements.progress_jitter", .. }));

    let mut s = FlythroughSettings::default();
    s.elements.progress_jitter = f32::NAN;
    assert!(s.validate().is_err());

    s.elements.progress_jitter = 0.0;
    assert!(s.validate().is_ok());
}

#[test]
fn time_scale_must_be_positive() {
    let err = FlythroughSettings::from_json_str(r#"{ "camera": { "time_scale": 0.0 } }"#).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { name: "camera.time_scale", .. }));

    let mut s = FlythroughSettings::default();
    s.camera.time_scale = f64::INFINITY;
    assert!(s.validate().is_err());
}

#[test]
fn lookahead_must_be_positive() {
    let err = FlythroughSettings::from_json_str(r#"{ "camera": { "lookahead": -0.01 } }"#).unwrap_err();
    assert!(matches!(err, FlythroughError::InvalidParameter { name: "camera.lookahead", .. }));

    let mut s = FlythroughSettings::default();
    s.camera.lookahead = f32::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn path_with_too_few_points_fails_to_build() {
    let json = r#"{ "path": { "points": [[0, 0, 0], [1, 0, 0]] } }"#;
    let s = FlythroughSettings::from_json_str(json).unwrap();
    assert!(s.path.build().is_err());
}

// ============================================================================
// Style Updates
// ============================================================================

#[test]
fn element_update_from_json_merges_partially() {
    let update: ElementStyleUpdate = serde_json::from_str(r#"{ "count": 12 }"#).unwrap();
    let style = ElementStyle {
        visual_style: VisualStyle::Solid,
        color: ColorValue::Random,
        count: 150,
    }
    .merged(&update);

    assert_eq!(style.count, 12);
    assert_eq!(style.visual_style, VisualStyle::Solid);
    assert_eq!(style.color, ColorValue::Random);
}
