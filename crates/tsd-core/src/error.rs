//! Error handling types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors of the detection pipeline
///
/// Every variant aborts the whole run; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A root, manifest or scratch path could not be read or written
    #[error("File system error at {}: {source}", .path.display())]
    FileSystem {
        /// The offending path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The test tree walk failed part way through
    #[error("Failed to traverse {}: {source}", .root.display())]
    Traversal {
        /// Root of the walk
        root: PathBuf,
        /// The underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// A manifest field cannot be written without breaking the line format
    #[error("Cannot write manifest field {field:?}: {reason}")]
    InvalidField {
        /// The rejected field value
        field: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The detector process could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading the detector's output or waiting for it failed
    #[error("I/O error while running {program}: {source}")]
    ToolIo {
        /// Program being supervised
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The detector exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", exit_description(.exit_code))]
    ToolFailed {
        /// Program that failed
        program: String,
        /// Exit code, `None` when killed by a signal
        exit_code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The detector did not finish in time
    #[error("{program} did not finish within {secs}s")]
    ToolTimeout {
        /// Program that timed out
        program: String,
        /// Configured timeout
        secs: u64,
    },
}

fn exit_description(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a file system error for `path`
    pub fn fs<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }
}
