//! Runtime configuration.
//!
//! Settings come from an optional TOML file, then command-line overrides:
//!
//! ```toml
//! [store]
//! backend = "sqlite"
//! location = "gpa.db"
//!
//! [logging]
//! level = "debug"
//! file = "gpa.log"
//!
//! [appearance]
//! prefer_dark = true
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use gpa_core::store::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub location: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let defaults = StoreConfig::default();
        Self {
            backend: defaults.backend,
            location: defaults.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// An `EnvFilter` directive such as `info` or `gpa_ui=debug`.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSection {
    /// Forces the system dark-mode answer; `None` asks the desktop.
    pub prefer_dark: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSection,
    pub logging: LoggingSection,
    pub appearance: AppearanceSection,
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub location: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub prefer_dark: Option<bool>,
}

impl AppConfig {
    pub fn from_toml_str(
        source: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend.trim().is_empty() {
            return Err(ConfigError::Invalid("store.backend must not be empty".into()));
        }
        if self.store.backend != "memory" && self.store.location.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "store.location must be set for the {} backend",
                self.store.backend
            )));
        }
        EnvFilter::try_new(&self.logging.level).map_err(|e| {
            ConfigError::Invalid(format!("logging.level '{}': {e}", self.logging.level))
        })?;
        Ok(())
    }

    /// Applies command-line overrides and re-validates.
    pub fn with_overrides(
        mut self,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(location) = overrides.location {
            self.store.location = location;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.log_file.is_some() {
            self.logging.file = overrides.log_file;
        }
        if overrides.prefer_dark.is_some() {
            self.appearance.prefer_dark = overrides.prefer_dark;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            location: self.store.location.clone(),
        }
    }
}
