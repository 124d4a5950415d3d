//! Infrastructure layer constants
//!
//! Domain defaults (test marker, manifest file name) live in
//! `tsd_core::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "tsd.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "tsd";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "TSD";

/// Separator for nested keys in environment variables (`TSD_PROJECT__TEST_PATH`)
pub const CONFIG_ENV_NESTING: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a tracing filter directive
pub const LOG_FILTER_ENV: &str = "TSD_LOG";
