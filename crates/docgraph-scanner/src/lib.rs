//! # Corpus Scanner
//!
//! Discovery and parsing of the documents of a corpus.
//!
//! This crate provides:
//! - Recursive discovery through a [`DocumentSource`](docgraph_core::DocumentSource)
//! - Metadata parsing per file, with degraded entries for malformed blocks
//! - A bounded `rayon` worker pool for larger corpora
//! - Cooperative cancellation between file units
//!
//! ## Quick Start
//!
//! ```no_run
//! use docgraph_scanner::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> docgraph_core::Result<()> {
//! let scanner = Scanner::new(ValidatorConfig::default());
//! let output = scanner.scan(Path::new("/path/to/docs"), &CancellationToken::new())?;
//! println!("{} entries, {} skipped", output.entries.len(), output.summary.skipped.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Ordering
//!
//! Entries always come back in lexicographic path order, whether the scan
//! ran sequentially or on the worker pool. When two files declare the same
//! id, the first one in that order keeps it.

pub mod scanner;

pub use scanner::{ScanOutput, Scanner};
pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::scanner::{ScanOutput, Scanner};
    pub use docgraph_core::prelude::*;
    pub use tokio_util::sync::CancellationToken;
}
