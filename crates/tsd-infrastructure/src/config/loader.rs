//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! command-line overrides and default values, using Figment.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use tsd_core::{Error, Result};

use super::TsdConfig;
use crate::constants::{
    CONFIG_ENV_NESTING, CONFIG_ENV_PREFIX, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,

    /// Highest-priority values, usually from the command line
    overrides: Option<Figment>,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
            overrides: None,
        }
    }

    /// Set the configuration file path
    ///
    /// An explicit file must exist; the default locations are optional.
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merge `overrides` on top of every other source
    ///
    /// Only the keys present in the serialized value are overridden, so
    /// `None` fields should be skipped during serialization.
    pub fn with_overrides<T: Serialize>(mut self, overrides: &T) -> Self {
        self.overrides = Some(Figment::from(Serialized::defaults(overrides)));
        self
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The TOML file `load` reads: the explicit path, else the first default
    /// location that exists
    ///
    /// Nothing is logged while loading, since logging is configured from the
    /// result; callers report the source once logging is up.
    pub fn source_path(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(Self::find_default_config_path)
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `TsdConfig::default()`
    /// 2. TOML configuration file (explicit path, else the first default location found)
    /// 3. Environment variables with prefix (e.g., `TSD_PROJECT__NAME`)
    /// 4. Overrides
    pub fn load(&self) -> Result<TsdConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(TsdConfig::default()));

        if let Some(config_path) = &self.config_path
            && !config_path.is_file()
        {
            return Err(Error::config(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        if let Some(source) = self.source_path() {
            figment = figment.merge(Toml::file(source));
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_NESTING),
        );

        if let Some(overrides) = &self.overrides {
            figment = figment.merge(overrides.clone());
        }

        let config: TsdConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("Failed to extract configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(format!(".{DEFAULT_CONFIG_DIR}"))
                .join(DEFAULT_CONFIG_FILENAME),
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|path| path.is_file())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
