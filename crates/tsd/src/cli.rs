//! Command-line interface
//!
//! Every flag maps onto a configuration key and is merged last, above the
//! configuration file and `TSD_*` environment variables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// Command line interface for tsd
#[derive(Parser, Debug)]
#[command(name = "tsd")]
#[command(about = "Pair unit tests with production sources and run a test-smell detector")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the test/production manifest and print its path
    Manifest {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Write the manifest and run the detector over it
    Run {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        tool: ToolArgs,
    },
    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        tool: ToolArgs,
    },
}

/// Where the sources are and where the manifest goes
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project name written into every manifest row
    #[arg(long)]
    pub project_name: Option<String>,

    /// Root of the test sources
    #[arg(long)]
    pub test_path: Option<PathBuf>,

    /// Root of the production sources
    #[arg(long)]
    pub src_path: Option<PathBuf>,

    /// Directory for the manifest (default: a fresh temporary directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Remove the temporary manifest directory when done
    #[arg(long)]
    pub clean_scratch: bool,
}

/// How to launch the detector
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to the detector jar
    #[arg(long)]
    pub tool_path: Option<PathBuf>,

    /// Program that launches the jar
    #[arg(long)]
    pub runtime: Option<String>,

    /// Kill the detector after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Working directory of the detector
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
}

impl Cli {
    /// Configuration values set on the command line
    pub fn overrides(&self) -> CliOverrides {
        let (project, tool) = match &self.command {
            Command::Manifest { project } => (project, None),
            Command::Run { project, tool } | Command::Config { project, tool } => {
                (project, Some(tool))
            }
        };
        let tool = tool.cloned().unwrap_or_default();

        CliOverrides {
            project: ProjectOverrides {
                name: project.project_name.clone(),
                test_path: project.test_path.clone(),
                src_path: project.src_path.clone(),
            },
            tool: ToolOverrides {
                path: tool.tool_path,
                runtime: tool.runtime,
                timeout_secs: tool.timeout_secs,
                working_dir: tool.working_dir,
            },
            output: OutputOverrides {
                dir: project.output_dir.clone(),
                keep_scratch: project.clean_scratch.then_some(false),
            },
            logging: LoggingOverrides {
                level: self.verbose.then(|| "debug".to_string()),
                json_format: self.json_logs.then_some(true),
            },
        }
    }
}

/// Sparse mirror of `TsdConfig`; unset fields are not serialized
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct CliOverrides {
    pub project: ProjectOverrides,
    pub tool: ToolOverrides,
    pub output: OutputOverrides,
    pub logging: LoggingOverrides,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ProjectOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ToolOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_scratch: Option<bool>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}
