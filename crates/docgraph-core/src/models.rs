//! Core data models for a document corpus.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Type-Safe**: Enums replace magic strings
//!
//! Entries move through the pipeline as values: the scanner creates them,
//! the analyzer and resolver attach links, and the validator derives
//! backlinks through [`InboundIndex`](crate::inbound::InboundIndex).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Maximum length of a link context snippet, in characters.
pub const MAX_CONTEXT_LEN: usize = 200;

/// Lifecycle status declared in a document's metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Active,
    Deprecated,
    Draft,
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "deprecated" => Ok(Self::Deprecated),
            "draft" => Ok(Self::Draft),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Deprecated => "deprecated",
            Self::Draft => "draft",
        };
        f.write_str(s)
    }
}

/// Typed view of a document's leading metadata block.
///
/// Known keys are validated when the block is parsed; anything else is kept
/// verbatim in `extra` so that no author-supplied data is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub status: EntryStatus,
    pub tags: BTreeSet<String>,
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Syntax a link was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// `[label](target)`
    PlainReference,
    /// `[[target]]`
    ShortReference,
    /// `[[target|alias]]`
    AliasedShortReference,
    /// `[[code:path]]` or `[[code:path::symbol]]`
    CodeReference,
}

impl LinkKind {
    /// Short and aliased-short references are resolved by title as well as id.
    pub fn is_short(&self) -> bool {
        matches!(self, Self::ShortReference | Self::AliasedShortReference)
    }
}

/// Resolution outcome of a link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Not (yet) resolved to anything
    #[default]
    Unresolved,
    /// Points at an existing document or file
    Valid,
    /// Target does not exist
    Broken,
    /// Whitelisted external target, not part of the graph
    External,
    /// More than one document matches equally well
    Ambiguous,
}

impl LinkStatus {
    /// Broken and ambiguous links are graph integrity failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Broken | Self::Ambiguous)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unresolved => "unresolved",
            Self::Valid => "valid",
            Self::Broken => "broken",
            Self::External => "external",
            Self::Ambiguous => "ambiguous",
        };
        f.write_str(s)
    }
}

/// A reference from one document to another, as found in the body text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source_id: String,
    pub target_raw: String,
    pub target_resolved: Option<String>,
    pub kind: LinkKind,
    /// Link text for plain references, alias for aliased short references
    pub label: Option<String>,
    /// Symbol of a `[[code:path::symbol]]` reference
    pub symbol: Option<String>,
    /// 1-indexed line within the source file
    pub line_number: usize,
    /// 1-indexed character column within the line
    pub column: usize,
    pub context: String,
    pub status: LinkStatus,
}

impl Link {
    /// Create a draft (unresolved) link
    pub fn draft(
        kind: LinkKind,
        source_id: impl Into<String>,
        target_raw: impl Into<String>,
        line_number: usize,
        column: usize,
        context: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_raw: target_raw.into(),
            target_resolved: None,
            kind,
            label: None,
            symbol: None,
            line_number,
            column,
            context: context.into(),
            status: LinkStatus::Unresolved,
        }
    }

    /// Set the label or alias
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the code symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Return a copy of this link carrying a resolution outcome.
    pub fn resolved(&self, target: Option<String>, status: LinkStatus) -> Self {
        Self {
            target_resolved: target,
            status,
            ..self.clone()
        }
    }

    /// The target with any `#fragment` removed.
    pub fn target_without_fragment(&self) -> &str {
        match self.target_raw.find('#') {
            Some(idx) => self.target_raw[..idx].trim(),
            None => self.target_raw.trim(),
        }
    }
}

/// One document of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    /// Path relative to the corpus root
    pub path: PathBuf,
    pub title: String,
    pub status: EntryStatus,
    pub tags: BTreeSet<String>,
    pub aliases: Vec<String>,
    pub body: String,
    pub outbound_links: Vec<Link>,
    /// Reason the metadata block was rejected, if it was
    pub degraded: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// Lines of the file that precede `body`
    #[serde(default)]
    pub body_line_offset: usize,
    /// Written only by `InboundIndex::apply`
    #[serde(default)]
    inbound_ids: Vec<String>,
}

impl Entry {
    /// Build an entry from parsed metadata.
    ///
    /// The id falls back to the slug of the file stem and the title to the
    /// first level-1 heading, then to the file stem.
    pub fn from_metadata(path: PathBuf, metadata: DocumentMetadata, body: String) -> Self {
        let stem = file_stem(&path);
        let id = metadata
            .id
            .filter(|id| !id.trim().is_empty())
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| fallback_id(&stem));
        let title = metadata
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| first_heading(&body))
            .unwrap_or(stem);

        Self {
            id,
            path,
            title,
            status: metadata.status,
            tags: metadata.tags,
            aliases: metadata.aliases,
            body,
            outbound_links: Vec::new(),
            degraded: None,
            extra: metadata.extra,
            body_line_offset: 0,
            inbound_ids: Vec::new(),
        }
    }

    /// Build an entry whose metadata block could not be used.
    pub fn degraded(path: PathBuf, body: String, reason: impl Into<String>) -> Self {
        let mut entry = Self::from_metadata(path, DocumentMetadata::default(), body);
        entry.degraded = Some(reason.into());
        entry
    }

    /// Ids of entries with a valid link to this one
    pub fn inbound_ids(&self) -> &[String] {
        &self.inbound_ids
    }

    pub(crate) fn set_inbound_ids(&mut self, ids: Vec<String>) {
        self.inbound_ids = ids;
    }

    /// Whether the metadata block was rejected
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Links that point into the corpus (everything except external ones)
    pub fn internal_links(&self) -> impl Iterator<Item = &Link> {
        self.outbound_links
            .iter()
            .filter(|link| link.status != LinkStatus::External)
    }

    /// Record how many file lines precede the body
    pub fn with_body_line_offset(mut self, offset: usize) -> Self {
        self.body_line_offset = offset;
        self
    }

    /// Replace the outbound links, returning the updated entry
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.outbound_links = links;
        self
    }
}

fn file_stem(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Slug of the file stem, or the stem itself when nothing alphanumeric is left
fn fallback_id(stem: &str) -> String {
    let slug = slugify(stem);
    if slug.is_empty() { stem.to_string() } else { slug }
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Lowercase slug: runs of non-alphanumeric characters collapse to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
