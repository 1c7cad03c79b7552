//! # docgraph Parser
//!
//! Metadata block parsing and link extraction for a document corpus.
//!
//! This crate provides:
//! - Metadata extraction: a leading `---` YAML block parsed into a typed
//!   [`DocumentMetadata`] record, unknown keys preserved
//! - Link extraction: plain references `[label](target)`, short references
//!   `[[target]]` / `[[target|alias]]`, and code references
//!   `[[code:path::symbol]]`
//! - **Code block awareness**: patterns inside fenced blocks and inline code
//!   are excluded
//!
//! Everything here is pure: no I/O and no shared state.
//!
//! ## Quick Start
//!
//! ```
//! use docgraph_parser::{extract_with_offset, parse_metadata};
//!
//! let text = "---\nid: intro\ntitle: Introduction\n---\nSee [[Setup Guide]].\n";
//! let (metadata, body, offset) = parse_metadata(text).unwrap();
//! assert_eq!(metadata.id.as_deref(), Some("intro"));
//!
//! let links = extract_with_offset(&body, "intro", offset);
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].target_raw, "Setup Guide");
//! assert_eq!(links[0].line_number, 5);
//! ```
//!
//! ## Performance
//!
//! - `std::sync::LazyLock` for compiled regex patterns
//! - Fast pre-filters skip a regex when its pattern cannot be present
//! - One pass per line; results sorted once at the end

mod analyzer;
pub mod parsers;

pub use analyzer::{extract, extract_with_offset};
pub use parsers::metadata::{body_after_block, parse_metadata};

// Re-export core types for consumers
pub use docgraph_core::{DocumentMetadata, Link, LinkKind, LinkStatus};

/// Convenient prelude for common imports.
pub mod prelude {
    pub use crate::{
        DocumentMetadata, Link, LinkKind, LinkStatus, body_after_block, extract,
        extract_with_offset, parse_metadata,
    };
}
