//! Configuration Module
//!
//! Settings are merged from defaults, a TOML file, `TSD_*` environment
//! variables and command-line overrides, in that order.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ConventionConfig, LoggingConfig, OutputConfig, ProjectConfig, ToolConfig, TsdConfig,
};
