//! Integration tests for Settings config loading.
//!
//! These tests pass an explicit local config file, so the working directory's
//! `.sunburst.toml` never takes part.

use std::fs;

use tempfile::TempDir;

use sunburst::application::ApplicationError;
use sunburst::config::Settings;
use sunburst::domain::SumBy;

#[test]
fn given_local_config_when_load_then_chart_fields_applied() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.toml");
    fs::write(
        &path,
        r##"
pretty = false

[chart]
width = 640
padding = 12.5
color_scale = "#111,#222"
sum_by = "count"
sort_data = true
"##,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert!(!settings.pretty);
    assert_eq!(settings.chart.width, Some(640.0));
    assert_eq!(settings.chart.padding, Some(12.5));
    assert_eq!(settings.chart.sum_by, Some(SumBy::Count));
    assert_eq!(settings.chart.sort_data, Some(true));
    assert!(settings.chart.height.is_none());
}

#[test]
fn given_local_config_with_theme_path_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.toml");
    fs::write(&path, "theme_file = \"~/themes/dark.toml\"\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    let theme = settings.theme_file.unwrap();
    assert!(!theme.to_string_lossy().contains('~'));
    assert!(theme.ends_with("themes/dark.toml"));
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[chart\nwidth = ").unwrap();

    let result = Settings::load(Some(&path));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("broken.toml"), "{message}")
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_loaded_settings_when_converting_then_options_carry_chart_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.toml");
    fs::write(&path, "[chart]\nheight = 300\nmin_radians = 0.05\n").unwrap();

    let options = Settings::load(Some(&path)).unwrap().chart.to_options();

    assert_eq!(options.height, Some(300.0));
    assert_eq!(options.min_radians, Some(0.05));
    assert!(options.width.is_none());
}
