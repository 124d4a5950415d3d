//! Test file naming convention
//!
//! A test file is recognised by a marker token placed right before the source
//! extension (`FooTest.java`). Its production counterpart is the same name
//! with the marker removed (`Foo.java`), at the same relative location.
//!
//! Only the final path component is ever rewritten, so a marker that appears
//! in a directory name (`FooTest.java/`, `TestUtils/`) is left untouched.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SOURCE_EXTENSION, DEFAULT_TEST_MARKER};

/// Maps test file names to production file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    marker: String,
    extension: String,
}

impl NamingConvention {
    /// Create a convention from a marker token and a source extension
    ///
    /// The extension may be given with or without its leading dot.
    pub fn new(marker: impl Into<String>, extension: impl AsRef<str>) -> Self {
        Self {
            marker: marker.into(),
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Trailing substring identifying a test file, e.g. `Test.java`
    pub fn suffix(&self) -> String {
        format!("{}.{}", self.marker, self.extension)
    }

    /// True if the final component of `path` names a test file
    pub fn is_test_file(&self, path: &Path) -> bool {
        self.production_file_name(path).is_some()
    }

    /// Derive the production path for a test path
    ///
    /// Works on relative and absolute paths alike; parent components are kept
    /// verbatim. Returns `None` when the file name does not end with the
    /// marker suffix, when nothing precedes the marker, or when the name is
    /// not valid UTF-8.
    pub fn derive_production_path(&self, test_path: &Path) -> Option<PathBuf> {
        let name = self.production_file_name(test_path)?;
        Some(test_path.with_file_name(name))
    }

    fn production_file_name(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(&self.suffix())?;
        if stem.is_empty() {
            return None;
        }
        Some(format!("{stem}.{}", self.extension))
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_MARKER, DEFAULT_SOURCE_EXTENSION)
    }
}
