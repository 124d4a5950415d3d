//! Test-smell detection input pipeline
//!
//! Pairs unit-test sources with the production sources they exercise and
//! hands the pairing to an external test-smell detector:
//!
//! - [`convention`]: maps a test file name to its production file name
//! - [`manifest`]: walks the test tree and renders the CSV manifest
//! - [`scratch`]: where the manifest lives while the detector reads it
//! - [`tool`]: supervised invocation of the detector
//!
//! # Example
//!
//! ```ignore
//! use tsd_core::{ManifestBuilder, ScratchSpace};
//!
//! let manifest = ManifestBuilder::new("myproj", "src/test/java", "src/main/java").build()?;
//! let scratch = ScratchSpace::temporary()?;
//! let path = manifest.write_to(scratch.manifest_path())?;
//! ```

pub mod constants;
pub mod convention;
pub mod error;
pub mod manifest;
pub mod scratch;
pub mod tool;

pub use convention::NamingConvention;
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestBuilder, ManifestRow, ManifestStats};
pub use scratch::ScratchSpace;
pub use tool::{ToolInvocation, ToolOutcome};
