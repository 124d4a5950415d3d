//! Test/production pairing manifest
//!
//! The manifest is a headerless CSV read by the test-smell detector, one line
//! per test file that has a production counterpart:
//!
//! ```text
//! myproj,/abs/test/a/FooTest.java,/abs/main/a/Foo.java
//! ```
//!
//! Fields are not escaped. Paths containing the separator produce extra
//! columns; paths containing a line break are rejected outright so that the
//! line count always equals the row count.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::FIELD_SEPARATOR;
use crate::convention::NamingConvention;
use crate::error::{Error, Result};

/// One test file paired with its production file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    project_name: String,
    test_file: PathBuf,
    production_file: PathBuf,
}

impl ManifestRow {
    pub fn new(
        project_name: impl Into<String>,
        test_file: impl Into<PathBuf>,
        production_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            test_file: test_file.into(),
            production_file: production_file.into(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn test_file(&self) -> &Path {
        &self.test_file
    }

    pub fn production_file(&self) -> &Path {
        &self.production_file
    }

    /// Render the row as a newline-terminated CSV line
    pub fn to_csv_line(&self) -> Result<String> {
        let fields = [
            check_field(&self.project_name)?,
            path_field(&self.test_file)?,
            path_field(&self.production_file)?,
        ];
        let mut line = fields.join(FIELD_SEPARATOR);
        line.push('\n');
        Ok(line)
    }
}

fn path_field(path: &Path) -> Result<&str> {
    let field = path.to_str().ok_or_else(|| Error::InvalidField {
        field: path.to_string_lossy().into_owned(),
        reason: "path is not valid UTF-8",
    })?;
    check_field(field)
}

fn check_field(field: &str) -> Result<&str> {
    if field.contains(['\n', '\r']) {
        return Err(Error::InvalidField {
            field: field.to_string(),
            reason: "field contains a line break",
        });
    }
    Ok(field)
}

/// Counters collected while walking the test tree
///
/// `matched <= candidates <= scanned_files` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManifestStats {
    /// Regular files seen under the test root
    pub scanned_files: usize,
    /// Files whose name follows the test naming convention
    pub candidates: usize,
    /// Candidates with an existing production file
    pub matched: usize,
}

impl ManifestStats {
    /// Candidates dropped because no production file exists
    pub fn unmatched(&self) -> usize {
        self.candidates - self.matched
    }
}

/// Rows produced by a [`ManifestBuilder`], in traversal order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
    stats: ManifestStats,
}

impl Manifest {
    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn stats(&self) -> ManifestStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render every row; an empty manifest renders as an empty string
    pub fn to_csv(&self) -> Result<String> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.to_csv_line()?);
        }
        Ok(out)
    }

    /// Write the manifest to `path`, replacing any existing file
    ///
    /// The file is flushed, synced and closed before this returns. If writing
    /// fails the partial file is removed. Returns the absolute manifest path.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let path = std::path::absolute(path).map_err(|e| Error::fs(path, e))?;
        let content = self.to_csv()?;

        if let Err(e) = write_synced(&path, content.as_bytes()) {
            let _ = fs::remove_file(&path);
            return Err(Error::fs(path, e));
        }

        debug!(path = %path.display(), rows = self.rows.len(), "Manifest written");
        Ok(path)
    }
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}

/// Builds a [`Manifest`] from a test tree and a production tree
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    project_name: String,
    test_root: PathBuf,
    production_root: PathBuf,
    convention: NamingConvention,
}

impl ManifestBuilder {
    pub fn new(
        project_name: impl Into<String>,
        test_root: impl Into<PathBuf>,
        production_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            test_root: test_root.into(),
            production_root: production_root.into(),
            convention: NamingConvention::default(),
        }
    }

    /// Use a different test naming convention
    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// Walk the test tree and pair every test file with its production file
    ///
    /// Both roots must be readable directories. The walk does not follow
    /// symbolic links and visits entries sorted by file name, so an unchanged
    /// tree always yields the same rows. Any error during the walk aborts the
    /// build; nothing is written to disk here.
    pub fn build(&self) -> Result<Manifest> {
        let test_root = readable_dir(&self.test_root)?;
        let production_root = readable_dir(&self.production_root)?;

        debug!(
            test_root = %test_root.display(),
            production_root = %production_root.display(),
            suffix = %self.convention.suffix(),
            "Scanning test tree"
        );

        let mut rows = Vec::new();
        let mut stats = ManifestStats::default();

        for entry in WalkDir::new(&test_root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| Error::Traversal {
                root: test_root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            stats.scanned_files += 1;

            let Ok(relative) = entry.path().strip_prefix(&test_root) else {
                continue;
            };
            let Some(production_relative) = self.convention.derive_production_path(relative)
            else {
                continue;
            };
            stats.candidates += 1;

            let production_file = production_root.join(production_relative);
            if is_regular_file(&production_file)? {
                rows.push(ManifestRow::new(
                    self.project_name.clone(),
                    entry.path(),
                    production_file,
                ));
            }
        }

        stats.matched = rows.len();
        debug!(
            scanned = stats.scanned_files,
            candidates = stats.candidates,
            matched = stats.matched,
            "Test tree scanned"
        );

        Ok(Manifest { rows, stats })
    }
}

/// Resolve `root` to an absolute path and check it is a listable directory
fn readable_dir(root: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(root).map_err(|e| Error::fs(root, e))?;
    let metadata = fs::metadata(&abs).map_err(|e| Error::fs(&abs, e))?;
    if !metadata.is_dir() {
        return Err(Error::fs(
            abs,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    fs::read_dir(&abs).map_err(|e| Error::fs(&abs, e))?;
    Ok(abs)
}

/// Missing files are not an error; unreadable ones are
fn is_regular_file(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) =>
        {
            Ok(false)
        }
        Err(e) => Err(Error::fs(path, e)),
    }
}
