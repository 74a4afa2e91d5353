//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (chart fields unset, so the layout fallback applies)
//! 2. Global config: `$XDG_CONFIG_HOME/sunburst/sunburst.toml`
//! 3. Local config: `--config FILE`, else `./.sunburst.toml`
//! 4. Environment variables: `SUNBURST_*` prefix, `__` for nesting

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::options::ChartOptions;
use crate::application::ApplicationError;
use crate::domain::{ColorScaleSpec, PaddingSpec, SortOrder, SumBy};

const APP_NAME: &str = "sunburst";
const LOCAL_CONFIG: &str = ".sunburst.toml";
const ENV_PREFIX: &str = "SUNBURST";

/// Chart defaults applied below command line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Uniform padding on every side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Palette name or comma separated colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_radians: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_by: Option<SumBy>,
    /// Sort siblings heaviest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_data: Option<bool>,
}

impl ChartSettings {
    /// Overlay: fields set in `overlay` win.
    fn merge(&self, overlay: &ChartSettings) -> Self {
        Self {
            width: overlay.width.or(self.width),
            height: overlay.height.or(self.height),
            padding: overlay.padding.or(self.padding),
            color_scale: overlay
                .color_scale
                .clone()
                .or_else(|| self.color_scale.clone()),
            min_radians: overlay.min_radians.or(self.min_radians),
            sum_by: overlay.sum_by.or(self.sum_by),
            sort_data: overlay.sort_data.or(self.sort_data),
        }
    }

    pub fn to_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            padding: self.padding.map(PaddingSpec::Uniform),
            color_scale: self
                .color_scale
                .as_deref()
                .map(|s| s.parse::<ColorScaleSpec>().unwrap_or_default()),
            min_radians: self.min_radians,
            sum_by: self.sum_by,
            sort_data: self.sort_data.map(SortOrder::from),
            ..ChartOptions::default()
        }
    }
}

/// Raw settings for intermediate parsing (every field optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub theme_file: Option<PathBuf>,
    pub pretty: Option<bool>,
    pub chart: ChartSettings,
}

/// Unified configuration for the sunburst CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Theme file (JSON or TOML) applied to every chart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_file: Option<PathBuf>,
    /// Pretty-print JSON output
    pub pretty: bool,
    pub chart: ChartSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_file: None,
            pretty: true,
            chart: ChartSettings::default(),
        }
    }
}

/// Get the XDG config directory for sunburst.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG)
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in the theme path.
    fn expand_paths(&mut self) {
        if let Some(theme_file) = &self.theme_file {
            let raw = theme_file.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.theme_file = Some(PathBuf::from(expanded));
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            theme_file: overlay
                .theme_file
                .clone()
                .or_else(|| self.theme_file.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            chart: self.chart.merge(&overlay.chart),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `local` names an explicit config file, which must exist. Without it,
    /// `./.sunburst.toml` is used when present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        let local_path = match local {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(local_config_path(Path::new("."))).filter(|p| p.exists()),
        };
        if let Some(path) = local_path {
            debug!("local config: {}", path.display());
            current = current.merge_with(&load_raw_settings(&path)?);
        }

        current = current.apply_env_overrides(None)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply `SUNBURST_*` variables as explicit overrides.
    ///
    /// `source` replaces the process environment (used by tests).
    pub fn apply_env_overrides(
        mut self,
        source: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(source),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("theme_file") {
            self.theme_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("pretty") {
            self.pretty = val;
        }
        if let Ok(val) = config.get_float("chart.width") {
            self.chart.width = Some(val);
        }
        if let Ok(val) = config.get_float("chart.height") {
            self.chart.height = Some(val);
        }
        if let Ok(val) = config.get_float("chart.padding") {
            self.chart.padding = Some(val);
        }
        if let Ok(val) = config.get_string("chart.color_scale") {
            self.chart.color_scale = Some(val);
        }
        if let Ok(val) = config.get_float("chart.min_radians") {
            self.chart.min_radians = Some(val);
        }
        if let Ok(val) = config.get_string("chart.sum_by") {
            self.chart.sum_by = Some(match val.to_ascii_lowercase().as_str() {
                "size" => SumBy::Size,
                "count" => SumBy::Count,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("invalid {ENV_PREFIX}_CHART__SUM_BY: {other}"),
                    })
                }
            });
        }
        if let Ok(val) = config.get_bool("chart.sort_data") {
            self.chart.sort_data = Some(val);
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sunburst configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sunburst/sunburst.toml
#   Local:  ./.sunburst.toml (or --config FILE)
#   Env:    SUNBURST_* environment variables, e.g. SUNBURST_CHART__WIDTH=600
#
# Command line flags override everything here.

# Theme file (JSON or TOML) keyed by chart role, e.g. [sunburst]
# theme_file = "~/.config/sunburst/theme.toml"

# Pretty-print JSON output of `sunburst layout`
# pretty = true

[chart]
# width = 400
# height = 400
# padding = 30

# Palette name (grayscale, qualitative, heatmap, warm, cool, red, green, blue)
# or comma separated colors
# color_scale = "blue"

# Slices with an angular span at or below this are dropped
# min_radians = 0.001

# "size" or "count"
# sum_by = "size"

# Sort siblings heaviest first
# sort_data = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn given_defaults_when_converting_to_options_then_everything_unset() {
        let options = Settings::default().chart.to_options();
        assert!(options.width.is_none());
        assert!(options.color_scale.is_none());
        assert!(options.sort_data.is_none());
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replace_values() {
        let settings = Settings::default()
            .apply_env_overrides(env(&[
                ("SUNBURST_CHART__WIDTH", "600"),
                ("SUNBURST_CHART__COLOR_SCALE", "warm"),
                ("SUNBURST_CHART__SUM_BY", "count"),
                ("SUNBURST_PRETTY", "false"),
            ]))
            .unwrap();

        assert_eq!(settings.chart.width, Some(600.0));
        assert_eq!(settings.chart.color_scale.as_deref(), Some("warm"));
        assert_eq!(settings.chart.sum_by, Some(SumBy::Count));
        assert!(!settings.pretty);
    }

    #[test]
    fn given_invalid_sum_by_env_when_applying_overrides_then_config_error() {
        let result =
            Settings::default().apply_env_overrides(env(&[("SUNBURST_CHART__SUM_BY", "depth")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_raw_overlay_when_merging_then_only_set_fields_change() {
        let base = Settings {
            chart: ChartSettings {
                width: Some(300.0),
                height: Some(300.0),
                ..ChartSettings::default()
            },
            ..Settings::default()
        };
        let overlay = RawSettings {
            chart: ChartSettings {
                width: Some(500.0),
                ..ChartSettings::default()
            },
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.chart.width, Some(500.0));
        assert_eq!(merged.chart.height, Some(300.0));
        assert!(merged.pretty);
    }

    #[test]
    fn given_tilde_in_theme_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            theme_file: Some(PathBuf::from("~/theme.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let theme = settings.theme_file.unwrap();
        assert!(theme.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_color_list_setting_when_converting_then_explicit_colors() {
        let chart = ChartSettings {
            color_scale: Some("#111, #222".into()),
            padding: Some(10.0),
            ..ChartSettings::default()
        };
        let options = chart.to_options();
        assert_eq!(
            options.color_scale,
            Some(ColorScaleSpec::Colors(vec!["#111".into(), "#222".into()]))
        );
        assert_eq!(options.padding, Some(PaddingSpec::Uniform(10.0)));
    }

    #[test]
    fn given_settings_when_rendering_template_and_toml_then_both_parse() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.chart.width.is_none());

        let text = Settings::default().to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, Settings::default());
    }
}
