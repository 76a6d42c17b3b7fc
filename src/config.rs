//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/centroid/centroid.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `CENTROID_*` prefix, `__` between sections

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Pacing of `decompose --animate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between two centroid steps, in milliseconds
    pub step_delay_ms: u64,
    /// List the component entry nodes with every step
    pub show_components: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 2000,
            show_components: true,
        }
    }
}

impl PlaybackConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Tree rendering options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Append `@(x, y)` to labels of placed nodes
    pub show_positions: bool,
}

/// Raw sections for intermediate parsing (`None` = not specified in this layer).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPlaybackConfig {
    pub step_delay_ms: Option<u64>,
    pub show_components: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub show_positions: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_edge_distance: Option<f64>,
    pub playback: RawPlaybackConfig,
    pub render: RawRenderConfig,
}

/// Unified configuration for centroid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Distance for edges that name none and join unplaced nodes
    pub default_edge_distance: f64,
    pub playback: PlaybackConfig,
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_edge_distance: 1.0,
            playback: PlaybackConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Get the XDG config directory for centroid.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "centroid").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("centroid.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_edge_distance: overlay
                .default_edge_distance
                .unwrap_or(self.default_edge_distance),
            playback: PlaybackConfig {
                step_delay_ms: overlay
                    .playback
                    .step_delay_ms
                    .unwrap_or(self.playback.step_delay_ms),
                show_components: overlay
                    .playback
                    .show_components
                    .unwrap_or(self.playback.show_components),
            },
            render: RenderConfig {
                show_positions: overlay
                    .render
                    .show_positions
                    .unwrap_or(self.render.show_positions),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), explicit)
    }

    /// Load settings from the given file layers, then environment overrides.
    ///
    /// A missing global file is skipped, a missing explicit file is an error.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, optional
        if let Some(global_path) = global {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config, required when named
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply CENTROID_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CENTROID")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;
        Self::apply_overrides(settings, &config)
    }

    /// Every key is typed; a value that does not parse is an error rather
    /// than a silently kept default.
    fn apply_overrides(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Some(val) = override_value::<f64>(config, "default_edge_distance")? {
            settings.default_edge_distance = val;
        }
        if let Some(val) = override_value::<u64>(config, "playback.step_delay_ms")? {
            settings.playback.step_delay_ms = val;
        }
        if let Some(val) = override_value::<bool>(config, "playback.show_components")? {
            settings.playback.show_components = val;
        }
        if let Some(val) = override_value::<bool>(config, "render.show_positions")? {
            settings.render.show_positions = val;
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !self.default_edge_distance.is_finite() || self.default_edge_distance <= 0.0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "default_edge_distance must be a positive number, got {}",
                    self.default_edge_distance
                ),
            });
        }
        Ok(())
    }

    /// Serialize the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Serialize {
            what: "settings".to_string(),
            message: e.to_string(),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            r#"# centroid configuration
# Global location: $XDG_CONFIG_HOME/centroid/centroid.toml
# Every value can be overridden with CENTROID_<SECTION>__<KEY>, e.g.
#   CENTROID_PLAYBACK__STEP_DELAY_MS=500

# Distance for edges without one whose endpoints are not both placed
default_edge_distance = {:?}

[playback]
# Pause between centroid steps of `decompose --animate`
step_delay_ms = {}
# Show the component entry nodes of every step
show_components = {}

[render]
# Append node positions to labels
show_positions = {}
"#,
            defaults.default_edge_distance,
            defaults.playback.step_delay_ms,
            defaults.playback.show_components,
            defaults.render.show_positions,
        )
    }
}

/// `None` when `key` is absent, an error when it is present but malformed.
fn override_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("invalid override for {}: {}", key, e),
        }),
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

    #[test]
    fn given_no_layers_when_loading_then_uses_defaults() {
        let settings = Settings::load_layers(None, None).expect("load defaults");
        assert_eq!(settings.playback.step_delay_ms, 2000);
        assert!(settings.playback.show_components);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_values_are_kept() {
        let raw: RawSettings = toml::from_str("[playback]\nstep_delay_ms = 10\n").unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.playback.step_delay_ms, 10);
        assert!(merged.playback.show_components);
        assert_eq!(merged.default_edge_distance, 1.0);
    }

    #[test]
    fn given_template_when_parsed_then_equals_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    fn overrides(pairs: &[(&str, &str)]) -> Config {
        pairs
            .iter()
            .fold(Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn given_typed_overrides_when_applied_then_values_are_parsed() {
        let config = overrides(&[
            ("playback.step_delay_ms", "250"),
            ("render.show_positions", "true"),
        ]);
        let settings = Settings::apply_overrides(Settings::default(), &config).unwrap();
        assert_eq!(settings.playback.step_delay_ms, 250);
        assert!(settings.render.show_positions);
        assert_eq!(settings.default_edge_distance, 1.0);
    }

    #[test]
    fn given_malformed_override_when_applied_then_config_error_names_key() {
        let config = overrides(&[("playback.step_delay_ms", "abc")]);
        let err = Settings::apply_overrides(Settings::default(), &config).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
        assert!(err.to_string().contains("playback.step_delay_ms"));
    }

    #[test]
    fn given_non_positive_distance_then_validation_fails() {
        let settings = Settings {
            default_edge_distance: 0.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
