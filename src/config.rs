//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/docmerge/docmerge.toml`
//! 3. Environment variables: `DOCMERGE_*` prefix
//! 4. Command-line flags (applied by the CLI, they can only switch options on)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::codec::DEFAULT_JSON_INDENT;
use crate::application::ApplicationError;

/// Largest accepted JSON indentation.
pub const MAX_JSON_INDENT: usize = 16;

/// Unified configuration for docmerge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Treat kind mismatches as errors
    pub strict: bool,
    /// Emit JSON instead of YAML
    pub json: bool,
    /// Spaces per level in JSON output
    pub json_indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict: false,
            json: false,
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub strict: Option<bool>,
    pub json: Option<bool>,
    pub json_indent: Option<usize>,
}

/// Get the XDG config directory for docmerge.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "docmerge").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("docmerge.toml"))
}

/// Load a TOML file into RawSettings.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay values that the raw settings specify.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            strict: overlay.strict.unwrap_or(self.strict),
            json: overlay.json.unwrap_or(self.json),
            json_indent: overlay.json_indent.unwrap_or(self.json_indent),
        }
    }

    /// Load settings from the global config file and the environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence, reading the config file at `config_path`.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply DOCMERGE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DOCMERGE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            strict: optional(config.get_bool("strict"))?,
            json: optional(config.get_bool("json"))?,
            json_indent: optional(config.get_int("json_indent"))?
                .map(|indent| {
                    usize::try_from(indent).map_err(|_| ApplicationError::Config {
                        message: format!("json_indent must not be negative, got {}", indent),
                    })
                })
                .transpose()?,
        };

        Ok(settings.merge_with(&raw))
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.json_indent > MAX_JSON_INDENT {
            return Err(ApplicationError::Config {
                message: format!(
                    "json_indent must be at most {}, got {}",
                    MAX_JSON_INDENT, self.json_indent
                ),
            });
        }
        Ok(())
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }
}

/// Missing keys are fine, malformed values are not.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
