//! # Link Graph Analysis
//!
//! Resolution of extracted links and structural validation of the corpus.
//!
//! Provides:
//! - Link resolution (ids, relative paths, fuzzy titles, code references)
//! - Graph inversion into backlinks
//! - Health metrics (connectivity, link health, hubs, cycles)
//! - Anomaly detection (orphans, dead ends, broken and unresolved links)
//! - Fix suggestions for failing links
//!
//! ## Quick Start
//!
//! ```
//! use docgraph_graph::prelude::*;
//! use std::collections::HashMap;
//! use std::path::PathBuf;
//!
//! let meta = DocumentMetadata { id: Some("a".into()), ..Default::default() };
//! let a = Entry::from_metadata(PathBuf::from("a.md"), meta, String::new())
//!     .with_links(vec![Link::draft(LinkKind::ShortReference, "a", "b", 1, 1, "[[b]]")]);
//! let b = Entry::from_metadata(PathBuf::from("b.md"), DocumentMetadata::default(), String::new());
//!
//! let config = ValidatorConfig::default();
//! let entries = vec![a, b];
//! let inventory = FileInventory::from_paths(entries.iter().map(|e| e.path.clone()));
//! let index = ResolutionIndex::build(&entries, inventory, HashMap::new(), &config);
//! let resolved = resolve_all(entries, &index);
//!
//! let corpus = KnowledgeValidator::new(config).validate(resolved);
//! assert_eq!(corpus.report.inbound_index["b"], vec!["a".to_string()]);
//! assert_eq!(corpus.report.anomalies.orphan_ids.items, vec!["a".to_string()]);
//! ```
//!
//! ## Resolution Order
//!
//! 1. Whitelisted external prefixes
//! 2. Code references against the file inventory and prefetched sources
//! 3. Path-like targets, relative to the source document then to the root
//! 4. Exact canonical id
//! 5. Normalized title, alias or file stem
//!
//! A short reference that matches nothing is broken; a plain reference that
//! matches nothing stays unresolved. Two or more title matches make a link
//! ambiguous rather than picking one.
//!
//! ## Modules
//!
//! - [`resolver`] - Resolution index and link resolution
//! - [`graph`] - petgraph view of the valid links
//! - [`validator`] - Metrics, anomalies and the verdict
//!
//! ## Performance Characteristics
//!
//! - Index construction: O(n) over entries
//! - Resolution: O(total links), hash lookups per link
//! - Graph inversion: one pass over all links
//! - Cycle detection: O(n + m) with Tarjan's algorithm

pub mod graph;
pub mod resolver;
pub mod validator;

pub use graph::LinkGraph;
pub use resolver::{
    ResolutionIndex, code_sources_needed, normalize_title, resolve, resolve_all,
};
pub use validator::{
    KnowledgeValidator, SuggestionIndex, ValidatedCorpus, orphan_severity, top_hubs,
};

pub mod prelude {
    pub use crate::graph::LinkGraph;
    pub use crate::resolver::{
        ResolutionIndex, code_sources_needed, normalize_title, resolve, resolve_all,
    };
    pub use crate::validator::{KnowledgeValidator, ValidatedCorpus};
    pub use docgraph_core::prelude::*;
}
