//! Test-smell detector invocation
//!
//! The detector is a jar launched as `<runtime> -jar <tool> <manifest>`. The
//! call is supervised: it waits for the process, captures both output
//! streams and turns a spawn failure, a timeout or a non-zero exit into an
//! [`Error`]. The manifest must be fully written and closed before [`run`]
//! is called.
//!
//! [`run`]: ToolInvocation::run

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::constants::DEFAULT_TOOL_RUNTIME;
use crate::error::{Error, Result};

/// Result of a successful detector run
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    /// Exit code reported by the process
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time from spawn to exit
    pub elapsed: Duration,
}

/// A single detector run against one manifest
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    runtime: String,
    tool_path: PathBuf,
    manifest_path: PathBuf,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ToolInvocation {
    pub fn new(tool_path: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            runtime: DEFAULT_TOOL_RUNTIME.to_string(),
            tool_path: tool_path.into(),
            manifest_path: manifest_path.into(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Program used to launch the jar (`java` by default)
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Directory the detector runs in; it writes its report there
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill the detector if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Arguments passed to the runtime
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("-jar"),
            self.tool_path.clone().into_os_string(),
            self.manifest_path.clone().into_os_string(),
        ]
    }

    /// Human readable command line, for logs
    pub fn display_command(&self) -> String {
        format!(
            "{} -jar {} {}",
            self.runtime,
            self.tool_path.display(),
            self.manifest_path.display()
        )
    }

    /// Run the detector and wait for it to exit
    ///
    /// Relative jar and manifest paths are resolved against the current
    /// directory before the working directory is applied.
    pub async fn run(&self) -> Result<ToolOutcome> {
        let tool_path = absolute_path(&self.tool_path)?;
        let manifest_path = absolute_path(&self.manifest_path)?;
        if !tool_path.is_file() {
            return Err(Error::config(format!(
                "Detector jar not found: {}",
                tool_path.display()
            )));
        }

        let mut command = Command::new(&self.runtime);
        command
            .arg("-jar")
            .arg(&tool_path)
            .arg(&manifest_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(command = %self.display_command(), "Launching detector");
        let started = Instant::now();
        let child = command.spawn().map_err(|source| Error::Spawn {
            program: self.runtime.clone(),
            source,
        })?;

        // Dropping the pending future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::ToolTimeout {
                    program: self.runtime.clone(),
                    secs: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| Error::ToolIo {
            program: self.runtime.clone(),
            source,
        })?;

        let outcome = ToolOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        };

        for line in outcome.stdout.lines() {
            debug!(target: "tsd::detector", "{line}");
        }
        for line in outcome.stderr.lines() {
            debug!(target: "tsd::detector", stream = "stderr", "{line}");
        }

        if !output.status.success() {
            return Err(Error::ToolFailed {
                program: self.runtime.clone(),
                exit_code: outcome.exit_code,
                stderr: outcome.stderr.trim().to_string(),
            });
        }

        Ok(outcome)
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::fs(path, e))
}
