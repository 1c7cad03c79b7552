//! Filesystem adapter.
//!
//! The scanner talks to the corpus only through [`DocumentSource`], so tests
//! and embedders can swap in another implementation. Reads may run
//! concurrently. Writes are serialized by one reentrant lock; an `exists`
//! check followed by a `write` is not atomic and needs outside coordination.

use crate::error::{Error, Result};
use crate::report::FileIssue;
use parking_lot::ReentrantMutex;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which files `list` returns
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Suffixes with leading dot; empty means every file
    pub extensions: BTreeSet<String>,
    /// File or directory names that are pruned from the walk
    pub excluded: BTreeSet<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extensions(mut self, extensions: impl IntoIterator<Item = String>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn excluded(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.excluded.extend(names);
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&format!(".{}", ext)))
    }
}

/// Files found by a walk, plus the paths the walk could not enter or read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Matching files, sorted
    pub files: Vec<PathBuf>,
    /// Unreadable directories, broken symlinks and loops, sorted by path
    pub failures: Vec<FileIssue>,
}

impl Listing {
    /// A listing with no failures
    pub fn from_files(mut files: Vec<PathBuf>) -> Self {
        files.sort();
        Self {
            files,
            failures: Vec::new(),
        }
    }
}

/// Access to the files of a corpus
pub trait DocumentSource: Send + Sync {
    /// Read a whole file as UTF-8 text
    fn read(&self, path: &Path) -> Result<String>;

    /// All files below `root` matching `filter`.
    ///
    /// Only a missing root is an error; paths the walk cannot reach are
    /// reported in [`Listing::failures`].
    fn list(&self, root: &Path, filter: &ListFilter) -> Result<Listing>;

    fn exists(&self, path: &Path) -> bool;

    /// Size in bytes, if known
    fn size(&self, path: &Path) -> Option<u64>;

    /// Replace a file's contents
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// [`DocumentSource`] backed by the local disk
#[derive(Debug, Default)]
pub struct LocalFilesystem {
    write_lock: ReentrantMutex<()>,
}

impl LocalFilesystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSource for LocalFilesystem {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::file_not_found(path),
            _ => Error::io(e),
        })
    }

    fn list(&self, root: &Path, filter: &ListFilter) -> Result<Listing> {
        let meta = std::fs::metadata(root)
            .map_err(|e| Error::corpus_root_missing(root, e.to_string()))?;
        if !meta.is_dir() {
            return Err(Error::corpus_root_missing(root, "not a directory"));
        }

        let mut listing = Listing::default();
        let walk = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e
                        .file_name()
                        .to_str()
                        .is_some_and(|name| filter.excluded.contains(name))
            });

        for item in walk {
            match item {
                Ok(entry) => {
                    if entry.file_type().is_file() && filter.accepts(entry.path()) {
                        listing.files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    log::warn!("Skipping unreachable path {}: {}", path.display(), err);
                    listing.failures.push(FileIssue::new(path, err.to_string()));
                }
            }
        }

        listing.files.sort();
        listing.failures.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn size(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path).ok().map(|m| m.len())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::io)?;
        }

        // Write to a sibling temp file first, then rename over the target
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents).map_err(Error::io)?;
        std::fs::rename(&temp_path, path).map_err(Error::io)
    }
}
