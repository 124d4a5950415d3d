//! Configuration types

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tsd_core::constants::{DEFAULT_SOURCE_EXTENSION, DEFAULT_TEST_MARKER, DEFAULT_TOOL_RUNTIME};
use tsd_core::{Error, NamingConvention, Result};

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::logging::parse_log_level;

/// Complete runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsdConfig {
    pub project: ProjectConfig,
    pub tool: ToolConfig,
    pub output: OutputConfig,
    pub convention: ConventionConfig,
    pub logging: LoggingConfig,
}

/// The project whose tests are analysed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name written into every manifest row
    pub name: String,
    /// Root of the test sources
    pub test_path: Option<PathBuf>,
    /// Root of the production sources
    pub src_path: Option<PathBuf>,
}

/// The external test-smell detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path to the detector jar
    pub path: Option<PathBuf>,
    /// Program that launches the jar
    pub runtime: String,
    /// Kill the detector after this many seconds (0 disables the limit)
    pub timeout_secs: u64,
    /// Working directory of the detector, where it writes its report
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            path: None,
            runtime: DEFAULT_TOOL_RUNTIME.to_string(),
            timeout_secs: 0,
            working_dir: None,
        }
    }
}

/// Where the manifest is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the manifest; a temporary directory when unset
    pub dir: Option<PathBuf>,
    /// Keep the temporary directory after the run
    pub keep_scratch: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            keep_scratch: true,
        }
    }
}

/// Test file naming convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionConfig {
    pub marker: String,
    pub extension: String,
}

impl Default for ConventionConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_TEST_MARKER.to_string(),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

impl TsdConfig {
    /// Check settings that do not depend on the command being run
    pub fn validate(&self) -> Result<()> {
        if self.convention.marker.is_empty() {
            return Err(Error::config("convention.marker cannot be empty"));
        }
        if self.convention.extension.trim_start_matches('.').is_empty() {
            return Err(Error::config("convention.extension cannot be empty"));
        }
        if self.tool.runtime.is_empty() {
            return Err(Error::config("tool.runtime cannot be empty"));
        }
        parse_log_level(&self.logging.level)?;
        Ok(())
    }

    /// Check everything needed to build a manifest
    ///
    /// Returns the project name, test root and production root.
    pub fn manifest_inputs(&self) -> Result<(&str, &Path, &Path)> {
        self.validate()?;
        if self.project.name.trim().is_empty() {
            return Err(Error::config("project.name is required"));
        }
        let test_path = self
            .project
            .test_path
            .as_deref()
            .ok_or_else(|| Error::config("project.test_path is required"))?;
        let src_path = self
            .project
            .src_path
            .as_deref()
            .ok_or_else(|| Error::config("project.src_path is required"))?;
        Ok((&self.project.name, test_path, src_path))
    }

    /// Check that the detector can be launched, returning the jar path
    pub fn tool_path(&self) -> Result<&Path> {
        let path = self
            .tool
            .path
            .as_deref()
            .ok_or_else(|| Error::config("tool.path is required to run the detector"))?;
        if !path.is_file() {
            return Err(Error::config(format!(
                "tool.path does not point to a file: {}",
                path.display()
            )));
        }
        Ok(path)
    }

    pub fn convention(&self) -> NamingConvention {
        NamingConvention::new(&self.convention.marker, &self.convention.extension)
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool.timeout_secs > 0).then(|| Duration::from_secs(self.tool.timeout_secs))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to TOML: {e}")))
    }
}
