//! Detection pipeline
//!
//! Validate configuration, pair test files with production files, write the
//! manifest into the scratch space, then hand it to the detector. Nothing is
//! written to disk until the test tree has been walked successfully, and the
//! manifest file is closed before the detector starts.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use tsd_core::{
    Error, Manifest, ManifestBuilder, ManifestStats, Result, ScratchSpace, ToolInvocation,
    ToolOutcome,
};
use tsd_infrastructure::TsdConfig;

/// What a pipeline run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Absolute path of the manifest
    pub manifest_path: PathBuf,
    /// False when the temporary scratch directory was removed afterwards
    pub manifest_retained: bool,
    pub stats: ManifestStats,
    /// Detector result, present for full runs
    pub tool: Option<ToolOutcome>,
}

/// Runs the manifest and detector steps for one configuration
pub struct Pipeline {
    config: TsdConfig,
}

impl Pipeline {
    pub fn new(config: TsdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TsdConfig {
        &self.config
    }

    /// Write the manifest without running the detector
    ///
    /// A temporary scratch directory must be kept here, otherwise the
    /// manifest would be gone before anyone could read it.
    pub fn build_manifest(&self) -> Result<PipelineReport> {
        if self.config.output.dir.is_none() && !self.config.output.keep_scratch {
            return Err(Error::config(
                "--clean-scratch would delete the manifest right after writing it; \
                 set an output directory or keep the scratch directory",
            ));
        }
        let manifest = self.collect()?;
        let (scratch, manifest_path) = self.write(&manifest)?;
        let retained = scratch.release(self.config.output.keep_scratch)?;

        Ok(PipelineReport {
            manifest_path,
            manifest_retained: retained.is_some(),
            stats: manifest.stats(),
            tool: None,
        })
    }

    /// Write the manifest and run the detector over it
    pub async fn run(&self) -> Result<PipelineReport> {
        self.config.manifest_inputs()?;
        let tool_path = self.config.tool_path()?;
        let manifest = self.collect()?;
        let (scratch, manifest_path) = self.write(&manifest)?;

        let mut invocation = ToolInvocation::new(tool_path, &manifest_path)
            .with_runtime(&self.config.tool.runtime);
        if let Some(dir) = &self.config.tool.working_dir {
            invocation = invocation.with_working_dir(dir);
        }
        if let Some(timeout) = self.config.tool_timeout() {
            invocation = invocation.with_timeout(timeout);
        }

        info!(command = %invocation.display_command(), "Running test smell detector");
        let result = invocation.run().await;
        let retained = scratch.release(self.config.output.keep_scratch)?;
        let outcome = result?;

        info!(elapsed = ?outcome.elapsed, "Test smell detector finished");

        Ok(PipelineReport {
            manifest_path,
            manifest_retained: retained.is_some(),
            stats: manifest.stats(),
            tool: Some(outcome),
        })
    }

    fn collect(&self) -> Result<Manifest> {
        let (project_name, test_path, src_path) = self.config.manifest_inputs()?;

        info!(
            project = project_name,
            test_path = %test_path.display(),
            src_path = %src_path.display(),
            tool = ?self.config.tool.path,
            "Collecting test/production pairs"
        );

        let manifest = ManifestBuilder::new(project_name, test_path, src_path)
            .with_convention(self.config.convention())
            .build()?;

        let stats = manifest.stats();
        if manifest.is_empty() {
            warn!(
                scanned = stats.scanned_files,
                candidates = stats.candidates,
                "No test file has a production counterpart; the manifest is empty"
            );
        }
        Ok(manifest)
    }

    fn write(&self, manifest: &Manifest) -> Result<(ScratchSpace, PathBuf)> {
        let scratch = ScratchSpace::resolve(self.config.output.dir.as_deref())?;
        let manifest_path = manifest.write_to(scratch.manifest_path())?;

        let stats = manifest.stats();
        info!(
            path = %manifest_path.display(),
            rows = stats.matched,
            unmatched = stats.unmatched(),
            "Manifest written"
        );
        Ok((scratch, manifest_path))
    }
}
