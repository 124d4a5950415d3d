//! Domain constants
//!
//! Infrastructure defaults (config file names, log levels) live in
//! `tsd_infrastructure::constants`.

/// Token that marks a test file name (`FooTest.java`)
pub const DEFAULT_TEST_MARKER: &str = "Test";

/// Extension shared by test and production sources
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

/// File name of the manifest inside the scratch directory
pub const MANIFEST_FILE_NAME: &str = "input.csv";

/// Prefix of temporary scratch directories
pub const SCRATCH_DIR_PREFIX: &str = "tsdetect_input";

/// Manifest field separator
pub const FIELD_SEPARATOR: &str = ",";

/// Runtime used to launch the detector jar
pub const DEFAULT_TOOL_RUNTIME: &str = "java";
