//! Scratch space for the manifest
//!
//! The caller owns the scratch space for the whole run and decides when it is
//! released. Creating one never happens as a side effect of building a
//! manifest.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::constants::{MANIFEST_FILE_NAME, SCRATCH_DIR_PREFIX};
use crate::error::{Error, Result};

/// Directory holding the manifest while the detector reads it
#[derive(Debug)]
pub enum ScratchSpace {
    /// Caller-provided directory, never removed
    Directory(PathBuf),
    /// Fresh temporary directory, removed on release unless kept
    Temporary(TempDir),
}

impl ScratchSpace {
    /// Use `dir` as scratch space, creating it if needed
    pub fn in_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).map_err(|e| Error::fs(&dir, e))?;
        fs::create_dir_all(&dir).map_err(|e| Error::fs(&dir, e))?;
        Ok(Self::Directory(dir))
    }

    /// Create a fresh temporary directory in the system temp location
    pub fn temporary() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_DIR_PREFIX)
            .tempdir()
            .map_err(|e| Error::fs(std::env::temp_dir(), e))?;
        debug!(dir = %dir.path().display(), "Created scratch directory");
        Ok(Self::Temporary(dir))
    }

    /// Use `dir` when given, a temporary directory otherwise
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::in_dir(dir),
            None => Self::temporary(),
        }
    }

    pub fn dir(&self) -> &Path {
        match self {
            Self::Directory(dir) => dir,
            Self::Temporary(dir) => dir.path(),
        }
    }

    /// Where the manifest is written
    pub fn manifest_path(&self) -> PathBuf {
        self.dir().join(MANIFEST_FILE_NAME)
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// Release the scratch space
    ///
    /// Temporary directories are deleted unless `keep` is set. Returns the
    /// directory that is still on disk afterwards, if any.
    pub fn release(self, keep: bool) -> Result<Option<PathBuf>> {
        match self {
            Self::Directory(dir) => Ok(Some(dir)),
            Self::Temporary(dir) if keep => Ok(Some(dir.keep())),
            Self::Temporary(dir) => {
                let path = dir.path().to_path_buf();
                dir.close().map_err(|e| Error::fs(&path, e))?;
                debug!(dir = %path.display(), "Removed scratch directory");
                Ok(None)
            }
        }
    }
}
