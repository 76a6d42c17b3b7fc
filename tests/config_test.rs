//! Integration tests for Settings layered loading.
//!
//! These tests use temp files for both the global and the explicit layer and
//! do not touch CENTROID_* environment variables.

use std::fs;

use tempfile::TempDir;

use centroid::application::ApplicationError;
use centroid::config::Settings;

#[test]
fn given_missing_global_file_when_loading_then_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("centroid.toml");

    let settings = Settings::load_layers(Some(global.as_path()), None).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_file_when_loading_then_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("centroid.toml");
    fs::write(
        &global,
        r#"
default_edge_distance = 3.5

[playback]
step_delay_ms = 250
"#,
    )
    .unwrap();

    let settings = Settings::load_layers(Some(global.as_path()), None).expect("load settings");

    assert_eq!(settings.default_edge_distance, 3.5);
    assert_eq!(settings.playback.step_delay_ms, 250);
    // untouched keys keep their defaults
    assert!(settings.playback.show_components);
    assert!(!settings.render.show_positions);
}

#[test]
fn given_global_and_explicit_files_when_loading_then_explicit_wins() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("centroid.toml");
    let explicit = dir.path().join("local.toml");
    fs::write(&global, "[playback]\nstep_delay_ms = 250\nshow_components = false\n").unwrap();
    fs::write(&explicit, "[playback]\nstep_delay_ms = 10\n\n[render]\nshow_positions = true\n")
        .unwrap();

    let settings = Settings::load_layers(Some(global.as_path()), Some(explicit.as_path()))
        .expect("load settings");

    assert_eq!(settings.playback.step_delay_ms, 10);
    assert!(!settings.playback.show_components, "global value survives");
    assert!(settings.render.show_positions);
    assert_eq!(
        settings.playback.step_delay(),
        std::time::Duration::from_millis(10)
    );
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("nope.toml");

    let result = Settings::load_layers(None, Some(explicit.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("broken.toml");
    fs::write(&explicit, "default_edge_distance = [").unwrap();

    let err = Settings::load_layers(None, Some(explicit.as_path())).unwrap_err();

    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_negative_distance_when_loading_then_rejected() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("local.toml");
    fs::write(&explicit, "default_edge_distance = -1.0\n").unwrap();

    assert!(Settings::load_layers(None, Some(explicit.as_path())).is_err());
}

#[test]
fn given_settings_when_serialized_then_toml_round_trips() {
    let settings = Settings::default();
    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, settings);
}
