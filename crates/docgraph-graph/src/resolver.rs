//! Link resolution against a per-run index of the corpus.
//!
//! Resolution is a pure function of a link and a [`ResolutionIndex`]; the
//! index is built once per run and holds everything resolution needs,
//! including the file inventory and the prefetched code sources, so no I/O
//! happens here.

use docgraph_core::normalize_relative;
use docgraph_core::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a title for fuzzy matching: NFKC, lowercase, alphanumerics only.
///
/// # Example
/// ```
/// use docgraph_graph::normalize_title;
///
/// assert_eq!(normalize_title("Setup Guide"), "setupguide");
/// assert_eq!(normalize_title("setup-guide"), "setupguide");
/// assert_eq!(normalize_title("Ｓｅｔｕｐ　Ｇｕｉｄｅ"), "setupguide");
/// ```
pub fn normalize_title(text: &str) -> String {
    text.nfkc()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Lookup tables for one run
#[derive(Debug, Clone, Default)]
pub struct ResolutionIndex {
    /// Canonical id to relative path
    ids: HashMap<String, PathBuf>,
    /// Normalized title, alias, stem or id to matching ids
    titles: HashMap<String, BTreeSet<String>>,
    /// Relative document path to id
    paths: HashMap<PathBuf, String>,
    inventory: FileInventory,
    code_sources: HashMap<PathBuf, String>,
    config: ValidatorConfig,
}

impl ResolutionIndex {
    /// Index the entries of a run.
    ///
    /// `inventory` lists every corpus file and `code_sources` holds the
    /// contents of the files that code references with a symbol point at.
    pub fn build(
        entries: &[Entry],
        inventory: FileInventory,
        code_sources: HashMap<PathBuf, String>,
        config: &ValidatorConfig,
    ) -> Self {
        let mut index = Self {
            inventory,
            code_sources,
            config: config.clone(),
            ..Default::default()
        };

        for entry in entries {
            index.ids.insert(entry.id.clone(), entry.path.clone());
            if let Some(path) = normalize_relative(&entry.path) {
                index.paths.insert(path, entry.id.clone());
            }

            let stem = entry
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let names = [entry.title.as_str(), entry.id.as_str(), stem]
                .into_iter()
                .chain(entry.aliases.iter().map(String::as_str));
            for name in names {
                let key = normalize_title(name);
                if key.is_empty() {
                    continue;
                }
                index.titles.entry(key).or_default().insert(entry.id.clone());
            }
        }

        log::debug!(
            "Resolution index: {} ids, {} title keys, {} files",
            index.ids.len(),
            index.titles.len(),
            index.inventory.len()
        );
        index
    }

    /// Relative path of the entry with `id`
    pub fn entry_path(&self, id: &str) -> Option<&Path> {
        self.ids.get(id).map(PathBuf::as_path)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Ids whose title, alias, stem or id normalizes like `title`
    pub fn ids_for_title(&self, title: &str) -> Option<&BTreeSet<String>> {
        self.titles.get(&normalize_title(title))
    }

    fn has_document_suffix(&self, target: &str) -> bool {
        let lower = target.to_lowercase();
        self.config
            .document_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }

    fn is_path_like(&self, target: &str) -> bool {
        target.contains('/') || target.contains('\\') || self.has_document_suffix(target)
    }

    /// Look up a file: `Some(Some(id))` for a document entry, `Some(None)`
    /// for any other corpus file.
    fn lookup_file(&self, candidate: &Path) -> Option<Option<String>> {
        let normalized = normalize_relative(candidate)?;
        if let Some(id) = self.paths.get(&normalized) {
            return Some(Some(id.clone()));
        }
        if self.inventory.contains(&normalized) {
            return Some(None);
        }
        None
    }

    /// Try `candidate` as written, then with each document suffix appended
    fn lookup_with_suffixes(&self, candidate: &Path) -> Option<Option<String>> {
        if let Some(found) = self.lookup_file(candidate) {
            return Some(found);
        }
        if self.has_document_suffix(&candidate.to_string_lossy()) {
            return None;
        }
        self.config.document_extensions.iter().find_map(|ext| {
            let mut with_ext = candidate.as_os_str().to_os_string();
            with_ext.push(ext);
            self.lookup_file(Path::new(&with_ext))
        })
    }
}

/// Directory of the document that holds `link`
fn source_dir<'a>(link: &Link, index: &'a ResolutionIndex) -> &'a Path {
    index
        .entry_path(&link.source_id)
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""))
}

/// Candidate corpus-relative paths for a path-like target, in lookup order
fn path_candidates(target: &str, source_dir: &Path) -> Vec<PathBuf> {
    let target = target.replace('\\', "/");
    match target.strip_prefix('/') {
        Some(rooted) => vec![PathBuf::from(rooted)],
        None => vec![source_dir.join(&target), PathBuf::from(&target)],
    }
}

/// Resolve one link.
///
/// The first applicable rule wins:
/// 0. configured external prefix: `External`
/// 1. code reference: file in the inventory, symbol in its source
/// 2. path-like plain or short reference: relative to the source document,
///    then to the corpus root
/// 3. exact canonical id
/// 4. normalized title, alias or stem
/// 5. otherwise `Broken` for short references and `Unresolved` for plain ones
pub fn resolve(link: &Link, index: &ResolutionIndex) -> (Option<String>, LinkStatus) {
    let raw = link.target_without_fragment();
    let target = if link.kind == LinkKind::PlainReference {
        raw.replace("%20", " ")
    } else {
        raw.to_string()
    };

    if target.is_empty() {
        return (None, LinkStatus::Unresolved);
    }

    if index.config.is_external(&target) || index.config.is_external(&link.target_raw) {
        return (None, LinkStatus::External);
    }

    if link.kind == LinkKind::CodeReference {
        return resolve_code(link, &target, index);
    }

    if index.is_path_like(&target) {
        return resolve_path(link, &target, index);
    }

    if index.contains_id(&target) {
        return (Some(target), LinkStatus::Valid);
    }

    match index.ids_for_title(&target) {
        Some(ids) if ids.len() == 1 => (ids.first().cloned(), LinkStatus::Valid),
        Some(ids) if ids.len() > 1 => {
            log::debug!(
                "'{}' in {} matches {} entries",
                target,
                link.source_id,
                ids.len()
            );
            (None, LinkStatus::Ambiguous)
        }
        _ if link.kind.is_short() => (None, LinkStatus::Broken),
        _ => (None, LinkStatus::Unresolved),
    }
}

fn resolve_path(
    link: &Link,
    target: &str,
    index: &ResolutionIndex,
) -> (Option<String>, LinkStatus) {
    let dir = source_dir(link, index);
    let found = path_candidates(target, dir)
        .iter()
        .find_map(|candidate| index.lookup_with_suffixes(candidate));

    let result = match found {
        Some(Some(id)) => (Some(id), LinkStatus::Valid),
        Some(None) => (None, LinkStatus::Valid),
        None => (None, LinkStatus::Broken),
    };

    if index.contains_id(target) && result.0.as_deref() != Some(target) {
        log::warn!(
            "'{}' in {} is both a path and the id of another entry; using the path",
            target,
            link.source_id
        );
    }
    result
}

fn resolve_code(
    link: &Link,
    target: &str,
    index: &ResolutionIndex,
) -> (Option<String>, LinkStatus) {
    let Some(file) = code_file(target, source_dir(link, index), &index.inventory) else {
        return (None, LinkStatus::Broken);
    };

    let symbol = link.symbol.as_deref().unwrap_or_default();
    if symbol.is_empty() {
        return (None, LinkStatus::Valid);
    }

    match index.code_sources.get(&file) {
        Some(source) if contains_symbol(source, symbol) => (None, LinkStatus::Valid),
        Some(_) => {
            log::debug!("Symbol '{}' not found in {}", symbol, file.display());
            (None, LinkStatus::Broken)
        }
        None => (None, LinkStatus::Broken),
    }
}

/// First existing file for a code reference: corpus root, then the source
/// document's directory
fn code_file(target: &str, source_dir: &Path, inventory: &FileInventory) -> Option<PathBuf> {
    let target = target.replace('\\', "/");
    let rooted = target.trim_start_matches('/');
    [PathBuf::from(rooted), source_dir.join(rooted)]
        .into_iter()
        .filter_map(|candidate| normalize_relative(&candidate))
        .find(|candidate| inventory.contains(candidate))
}

/// Every `::`-separated segment of `symbol` occurs as a whole word
fn contains_symbol(source: &str, symbol: &str) -> bool {
    symbol
        .split("::")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .all(|segment| contains_word(source, segment))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Files whose contents code resolution needs: the target of every code
/// reference that names a symbol.
pub fn code_sources_needed(entries: &[Entry], inventory: &FileInventory) -> BTreeSet<PathBuf> {
    entries
        .iter()
        .flat_map(|entry| {
            let dir = entry.path.parent().unwrap_or_else(|| Path::new(""));
            entry
                .outbound_links
                .iter()
                .filter(|link| link.kind == LinkKind::CodeReference && link.symbol.is_some())
                .filter_map(move |link| code_file(link.target_without_fragment(), dir, inventory))
        })
        .collect()
}

/// Resolve every link of every entry
pub fn resolve_all(entries: Vec<Entry>, index: &ResolutionIndex) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|entry| {
            let links = entry
                .outbound_links
                .iter()
                .map(|link| {
                    let (target, status) = resolve(link, index);
                    link.resolved(target, status)
                })
                .collect();
            entry.with_links(links)
        })
        .collect()
}
