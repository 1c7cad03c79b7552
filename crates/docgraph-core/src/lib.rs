//! # Docgraph Core
//!
//! Core data models, error types, configuration and the filesystem adapter
//! for validating interlinked document corpora. Every other crate of the
//! workspace depends on these canonical types.
//!
//! ## Architecture Principles
//!
//! - **Type-Driven Design**: Strong types replace string-based APIs
//! - **Zero Panic in Libraries**: All errors are `Result<T, Error>`
//! - **Builder Pattern for Complex Types**: Configuration uses a builder
//! - **Derived State Stays Derived**: backlinks are only written by [`InboundIndex`]
//!
//! ## Core Modules
//!
//! - [`models`] - Entries, links and their enums
//! - [`inbound`] - Inverted link index (backlinks)
//! - [`inventory`] - Every file of the corpus, for existence checks
//! - [`report`] - Health metrics, anomalies and the validation verdict
//! - [`error`] - Error type and Result alias
//! - [`config`] - Run configuration
//! - [`profiles`] - Configuration presets
//! - [`fs`] - Filesystem adapter used by the scanner
//! - [`utils`] - Serialization and path helpers
//!
//! ## Usage Examples
//!
//! ```
//! use docgraph_core::prelude::*;
//! use std::path::PathBuf;
//!
//! let meta = DocumentMetadata {
//!     id: Some("setup-guide".to_string()),
//!     ..Default::default()
//! };
//! let entry = Entry::from_metadata(PathBuf::from("setup.md"), meta, "# Setup Guide".to_string());
//! assert_eq!(entry.id, "setup-guide");
//! assert_eq!(entry.title, "Setup Guide");
//! ```
//!
//! ```
//! use docgraph_core::prelude::*;
//!
//! let config = ValidatorConfig::builder().strict(true).top_hubs(3).build()?;
//! assert_eq!(config.mode, ValidationMode::Strict);
//! # Ok::<(), docgraph_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod inbound;
pub mod inventory;
pub mod models;
pub mod profiles;
pub mod report;
pub mod utils;

pub use config::*;
pub use error::{Error, Result};
pub use fs::{DocumentSource, ListFilter, Listing, LocalFilesystem};
pub use inbound::InboundIndex;
pub use inventory::FileInventory;
pub use models::*;
pub use profiles::ConfigProfile;
pub use report::*;
pub use utils::{CSVBuilder, display_path, normalize_relative, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ValidationMode, ValidatorConfig};
    pub use crate::error::{Error, Result};
    pub use crate::fs::{DocumentSource, ListFilter, Listing, LocalFilesystem};
    pub use crate::inbound::InboundIndex;
    pub use crate::inventory::FileInventory;
    pub use crate::models::{
        DocumentMetadata, Entry, EntryStatus, Link, LinkKind, LinkStatus, MAX_CONTEXT_LEN,
    };
    pub use crate::profiles::ConfigProfile;
    pub use crate::report::{
        AnomalyReport, BrokenLinkDetail, ExitCode, FileIssue, Finding, HealthMetrics, HubEntry,
        ScanSummary, Severity, ValidationReport,
    };
}
