//! Inverted link index (backlinks).
//!
//! This is the only writer of [`Entry::inbound_ids`], which keeps backlinks a
//! derived view of the valid outbound links and never independent state.

use crate::models::{Entry, LinkStatus};
use std::collections::{BTreeMap, HashSet};

/// Map from target id to the ids of the entries that reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundIndex {
    buckets: BTreeMap<String, Vec<String>>,
}

impl InboundIndex {
    /// Invert the graph in one pass over all entries and their links.
    ///
    /// Only valid links whose resolved target is another entry of the corpus
    /// count. Each source appears at most once per bucket, in the order the
    /// sources were first seen.
    pub fn build(entries: &[Entry]) -> Self {
        let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for entry in entries {
            for link in &entry.outbound_links {
                if link.status != LinkStatus::Valid {
                    continue;
                }
                let Some(target) = link.target_resolved.as_deref() else {
                    continue;
                };
                if target == entry.id || !ids.contains(target) {
                    continue;
                }
                if seen.insert((target, entry.id.as_str())) {
                    buckets
                        .entry(target.to_string())
                        .or_default()
                        .push(entry.id.clone());
                }
            }
        }

        Self { buckets }
    }

    /// Sources referencing `id` (empty if none)
    pub fn get(&self, id: &str) -> &[String] {
        self.buckets.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct sources referencing `id`
    pub fn inbound_count(&self, id: &str) -> usize {
        self.get(id).len()
    }

    /// Copy the buckets onto the entries, resetting any stale backlinks.
    pub fn apply(&self, entries: &mut [Entry]) {
        for entry in entries.iter_mut() {
            entry.set_inbound_ids(self.get(&entry.id).to_vec());
        }
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sorted view of the whole index
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.buckets
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentMetadata, Link, LinkKind};
    use std::path::PathBuf;

    fn entry(id: &str, targets: &[(&str, LinkStatus)]) -> Entry {
        let meta = DocumentMetadata {
            id: Some(id.to_string()),
            ..Default::default()
        };
        let links = targets
            .iter()
            .map(|(t, status)| {
                Link::draft(LinkKind::ShortReference, id, *t, 1, 1, "")
                    .resolved(Some(t.to_string()), *status)
            })
            .collect();
        Entry::from_metadata(PathBuf::from(format!("{}.md", id)), meta, String::new())
            .with_links(links)
    }

    #[test]
    fn test_chain_inversion() {
        let mut entries = vec![
            entry("a", &[("b", LinkStatus::Valid)]),
            entry("b", &[("c", LinkStatus::Valid)]),
            entry("c", &[]),
        ];
        let index = InboundIndex::build(&entries);
        assert_eq!(index.get("b"), ["a".to_string()]);
        assert_eq!(index.get("c"), ["b".to_string()]);
        assert!(index.get("a").is_empty());
        assert_eq!(index.len(), 2);

        index.apply(&mut entries);
        assert_eq!(entries[2].inbound_ids(), ["b".to_string()]);
    }

    #[test]
    fn test_ignores_non_valid_self_and_duplicate_links() {
        let entries = vec![
            entry(
                "a",
                &[
                    ("b", LinkStatus::Valid),
                    ("b", LinkStatus::Valid),
                    ("a", LinkStatus::Valid),
                    ("c", LinkStatus::Broken),
                    ("ghost", LinkStatus::Valid),
                ],
            ),
            entry("b", &[]),
            entry("c", &[]),
        ];
        let index = InboundIndex::build(&entries);
        assert_eq!(index.get("b"), ["a".to_string()]);
        assert!(index.get("a").is_empty());
        assert!(index.get("c").is_empty());
        assert!(index.get("ghost").is_empty());
    }

    #[test]
    fn test_cycles_are_plain_edges() {
        let entries = vec![
            entry("a", &[("b", LinkStatus::Valid)]),
            entry("b", &[("a", LinkStatus::Valid)]),
        ];
        let index = InboundIndex::build(&entries);
        assert_eq!(index.inbound_count("a"), 1);
        assert_eq!(index.inbound_count("b"), 1);
    }
}
