//! Set of every file in the corpus, documents or not.
//!
//! Built once by the scanner so that later stages can answer "does this
//! file exist" without touching the filesystem.

use crate::utils::normalize_relative;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Normalized corpus-relative paths of all discovered files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInventory {
    files: BTreeSet<PathBuf>,
}

impl FileInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from corpus-relative paths; paths escaping the root are dropped
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files = paths
            .into_iter()
            .filter_map(|p| normalize_relative(p.as_ref()))
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        Self { files }
    }

    /// Whether the corpus holds `path` (relative, normalized before lookup)
    pub fn contains(&self, path: &Path) -> bool {
        normalize_relative(path).is_some_and(|p| self.files.contains(&p))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_normalizes() {
        let inventory = FileInventory::from_paths(["docs/api.md", "src/lib.rs"]);
        assert_eq!(inventory.len(), 2);
        assert!(inventory.contains(Path::new("docs/api.md")));
        assert!(inventory.contains(Path::new("./docs/../src/lib.rs")));
        assert!(!inventory.contains(Path::new("../docs/api.md")));
        assert!(!inventory.contains(Path::new("docs")));
    }

    #[test]
    fn test_escaping_paths_are_dropped() {
        let inventory = FileInventory::from_paths(["../outside.md", "inside.md"]);
        assert_eq!(inventory.iter().collect::<Vec<_>>(), vec![&PathBuf::from("inside.md")]);
    }
}
