//! tsd - test-smell detection runner
//!
//! Pairs every unit-test source with the production source it covers, writes
//! the pairing as a CSV manifest and runs an external test-smell detector
//! (`java -jar <detector> <manifest>`) over it.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tsd manifest` | Write the manifest and print its path |
//! | `tsd run` | Write the manifest, run the detector, print the manifest path |
//! | `tsd config` | Print the effective configuration |

pub mod cli;
pub mod pipeline;

use anyhow::Context;
use tsd_infrastructure::logging::{init_logging, log_config_loaded};
use tsd_infrastructure::ConfigLoader;

pub use cli::{Cli, Command};
pub use pipeline::{Pipeline, PipelineReport};

/// Configuration loader for `cli`: file, environment, then command-line flags
pub fn config_loader(cli: &Cli) -> ConfigLoader {
    let loader = ConfigLoader::new().with_overrides(&cli.overrides());
    match &cli.config {
        Some(path) => loader.with_config_path(path),
        None => loader,
    }
}

/// Execute the parsed command line
///
/// Returns the text to print on stdout: the manifest path, or the effective
/// configuration for `tsd config`.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let loader = config_loader(&cli);
    let config = loader.load().context("failed to load configuration")?;

    if let Command::Config { .. } = cli.command {
        return Ok(config.to_toml()?);
    }

    init_logging(&config.logging)?;
    log_config_loaded(loader.source_path().as_deref());

    let pipeline = Pipeline::new(config);
    let report = match cli.command {
        Command::Run { .. } => pipeline.run().await?,
        _ => pipeline.build_manifest()?,
    };

    Ok(report.manifest_path.display().to_string())
}
