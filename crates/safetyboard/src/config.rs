//! Configuration management for safetyboard.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file,
//! and `SAFETYBOARD_` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::error::{Error, Result};
use crate::view::{SeverityFilter, SortOrder};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "safetyboard";

/// Default report time format, e.g. `Mar 15, 2025, 10:00 AM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Application configuration.
///
/// Precedence, highest first:
/// 1. Environment variables (prefixed with `SAFETYBOARD_`, sections split on `__`)
/// 2. TOML config file at `~/.config/safetyboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial dashboard state.
    pub dashboard: DashboardConfig,
    /// Submission form settings.
    pub form: FormConfig,
    /// Where the initial incidents come from.
    pub seed: SeedConfig,
    /// Output settings.
    pub display: DisplayConfig,
}

/// Initial dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Severity filter applied at startup.
    pub default_filter: SeverityFilter,
    /// Sort order applied at startup.
    pub default_sort: SortOrder,
    /// Pane shown at startup.
    pub default_tab: Tab,
}

/// Submission form settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// How long the success notice stays up, in milliseconds.
    pub success_notice_ms: u64,
}

/// Seed data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON file of incidents to start with instead of the built-in set.
    pub path: Option<PathBuf>,
    /// Use the built-in incidents when no path is given.
    pub builtin: bool,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Emit ANSI colours.
    pub color: bool,
    /// chrono format string for report times.
    pub timestamp_format: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_notice_ms: 3000,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            path: None,
            builtin: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        // Later merges win: defaults, then the file, then the environment
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SAFETYBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.form.success_notice_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "success_notice_ms must be greater than 0".to_string(),
            });
        }

        if self.display.timestamp_format.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "timestamp_format must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Pretty-printed JSON of the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// How long the success notice stays up.
    #[must_use]
    pub fn success_notice(&self) -> Duration {
        Duration::from_millis(self.form.success_notice_ms)
    }
}
