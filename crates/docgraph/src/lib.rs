//! # docgraph
//!
//! Validates the link graph of a corpus of interlinked markdown documents.
//!
//! Each document declares an id in a YAML metadata block and references other
//! documents with `[label](path.md)`, `[[Target]]`, `[[Target|alias]]` or
//! `[[code:path::symbol]]` links. A run scans the corpus, extracts and
//! resolves every link, inverts the graph into backlinks and scores its
//! health.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docgraph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     docgraph::logging::init("info");
//!
//!     let (report, exit_code) = docgraph::validate("./docs", true)?;
//!     println!("{}", docgraph::render(&report));
//!     std::process::exit(exit_code.code());
//! }
//! ```
//!
//! ## Pipeline
//!
//! Data flows one way through the stages:
//!
//! 1. [`Scanner`] discovers documents and parses metadata, in parallel for
//!    larger corpora
//! 2. [`extract_with_offset`] pulls links out of each body
//! 3. [`ResolutionIndex`] and [`resolve_all`] map link targets to entry ids
//! 4. [`KnowledgeValidator`] builds backlinks, metrics and anomalies
//! 5. [`render`] and [`MachineRecord`] turn the report into output
//!
//! [`Pipeline`] runs them all with a custom configuration, document source
//! and cancellation token; [`Pipeline::run_with_timeout`] bounds a run in
//! async code.

pub mod logging;
pub mod pipeline;

pub use docgraph_core::prelude::*;
pub use docgraph_export::{BrokenLinksExporter, HealthMetricsExporter, MachineRecord, render};
pub use docgraph_graph::{KnowledgeValidator, LinkGraph, ResolutionIndex, resolve, resolve_all};
pub use docgraph_parser::{extract, extract_with_offset, parse_metadata};
pub use docgraph_scanner::{CancellationToken, ScanOutput, Scanner};
pub use pipeline::{Pipeline, RunOutput};

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Validate the corpus below `corpus_root` with default settings.
///
/// `strict` turns broken and ambiguous links into a failing verdict.
pub fn validate(
    corpus_root: impl AsRef<Path>,
    strict: bool,
) -> Result<(ValidationReport, ExitCode)> {
    let config = ValidatorConfig::builder().strict(strict).build()?;
    let output = Pipeline::new(config).run(corpus_root.as_ref(), &CancellationToken::new())?;
    let exit_code = output.report.exit_code;
    Ok((output.report, exit_code))
}

/// Validate with an explicit configuration, giving up after `timeout`
pub async fn validate_with_timeout(
    corpus_root: impl Into<PathBuf>,
    config: ValidatorConfig,
    timeout: Duration,
) -> Result<RunOutput> {
    Pipeline::new(config).run_with_timeout(corpus_root, timeout).await
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::pipeline::{Pipeline, RunOutput};
    pub use docgraph_core::prelude::*;
    pub use docgraph_scanner::CancellationToken;
}
