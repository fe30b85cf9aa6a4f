//! Layered configuration loader.
//!
//! Discovers `friday.json5` in the user config directory and the working
//! directory, applies an explicit runtime file last, merges the layers, and
//! validates the effective `FridayConfig`.

mod merge;

#[cfg(test)]
mod tests;

use crate::{ConfigError, FridayConfig};
use directories::UserDirs;
use friday_rs_protocol::Capability;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "friday.json5";
/// Default config directory under the home directory.
const DEFAULT_CONFIG_DIR: &str = ".friday";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: FridayConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Explicit path passed at startup (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the cwd layer.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.friday/friday.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last. These must exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl FridayConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value)
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime overrides. Missing
    /// user and cwd files are skipped, and so are ones that fail to parse or
    /// validate on their own; missing or broken runtime files are an error.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());

        let cwd_path = options.cwd.join(DEFAULT_CONFIG_FILE);
        for (source, path) in [
            (ConfigLayerSource::User, options.user_config_path.as_deref()),
            (ConfigLayerSource::Cwd, Some(cwd_path.as_path())),
        ] {
            let Some(path) = path else {
                continue;
            };
            if !path.exists() {
                debug!(
                    "optional layer missing (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let value = match load_optional_layer(source, path) {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        "skipping unusable config layer (source={:?}, path={}): {}",
                        source,
                        path.display(),
                        err
                    );
                    continue;
                }
            };
            merge::merge_json_values(&mut merged, &value);
            layers.push(ConfigLayer {
                source,
                path: path.to_path_buf(),
            });
        }

        for runtime_path in &options.runtime_paths {
            if !runtime_path.exists() {
                return Err(ConfigError::MissingFile(runtime_path.clone()));
            }
            let value = load_layer_value(ConfigLayerSource::Runtime, runtime_path)?;
            merge::merge_json_values(&mut merged, &value);
            layers.push(ConfigLayer {
                source: ConfigLayerSource::Runtime,
                path: runtime_path.clone(),
            });
        }

        let config = config_from_value(merged)?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.assistant.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid_field(
                "assistant.temperature",
                format!("must be between 0 and 2, got {temperature}"),
            ));
        }
        if self.memory.path.as_os_str().is_empty() {
            return Err(invalid_field("memory.path", "cannot be empty"));
        }
        for name in &self.tools.deny {
            if Capability::from_name(name).is_none() {
                return Err(invalid_field(
                    "tools.deny",
                    format!("unknown capability '{name}'"),
                ));
            }
        }
        if self.tools.command_timeout_secs == 0 {
            return Err(invalid_field("tools.command_timeout_secs", "must be > 0"));
        }
        if self.tools.helper_timeout_secs == 0 {
            return Err(invalid_field("tools.helper_timeout_secs", "must be > 0"));
        }
        if self.tools.output_policy.max_result_chars == 0 {
            return Err(invalid_field(
                "tools.output_policy.max_result_chars",
                "must be > 0",
            ));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(invalid_field("email.smtp_host", "cannot be empty"));
        }
        if self.email.smtp_port == 0 {
            return Err(invalid_field("email.smtp_port", "must be > 0"));
        }
        for (path, url) in [
            ("web.weather_url", &self.web.weather_url),
            ("web.search_url", &self.web.search_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid_field(path, "must be an http(s) URL"));
            }
        }
        if self.web.timeout_secs == 0 {
            return Err(invalid_field("web.timeout_secs", "must be > 0"));
        }
        if self.web.search_limit == 0 {
            return Err(invalid_field("web.search_limit", "must be > 0"));
        }
        Ok(())
    }
}

fn invalid_field(path: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.into(),
    }
}

fn load_layer_value(source: ConfigLayerSource, path: &Path) -> Result<Value, ConfigError> {
    debug!(
        "loading config layer (source={:?}, path={})",
        source,
        path.display()
    );
    let contents = fs::read_to_string(path)?;
    let value: Value = json5::from_str(&contents)?;
    if !value.is_object() {
        return Err(invalid_field("$", "config root must be an object"));
    }
    Ok(value)
}

/// Load a discovered layer and check it decodes and validates by itself.
fn load_optional_layer(source: ConfigLayerSource, path: &Path) -> Result<Value, ConfigError> {
    let value = load_layer_value(source, path)?;
    config_from_value(value.clone())?;
    Ok(value)
}

fn config_from_value(value: Value) -> Result<FridayConfig, ConfigError> {
    let config: FridayConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Default user config path under the home directory.
fn default_user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}
