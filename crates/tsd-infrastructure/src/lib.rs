//! Infrastructure layer for tsd
//!
//! Cross-cutting concerns shared by the command-line facade:
//! configuration loading (defaults, TOML file, environment, CLI overrides)
//! and structured logging.

pub mod config;
pub mod constants;
pub mod logging;

pub use config::{
    ConfigLoader, ConventionConfig, LoggingConfig, OutputConfig, ProjectConfig, ToolConfig,
    TsdConfig,
};
