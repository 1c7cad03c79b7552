//! Corpus scanner: discovery, per-file parsing and reassembly in path order

use docgraph_core::prelude::*;
use docgraph_core::{display_path, normalize_relative};
use docgraph_parser::{body_after_block, parse_metadata};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Result of one scan
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Entries in lexicographic path order, duplicates removed
    pub entries: Vec<Entry>,
    /// Every corpus file, documents or not
    pub inventory: FileInventory,
    pub summary: ScanSummary,
}

/// What became of one document file
#[derive(Debug)]
enum FileOutcome {
    Parsed(Entry),
    Degraded(Entry, FileIssue),
    Skipped(FileIssue),
}

/// Turns a directory tree into entries
pub struct Scanner {
    config: ValidatorConfig,
    source: Arc<dyn DocumentSource>,
}

impl Scanner {
    /// Scanner over the local filesystem
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_source(config, Arc::new(LocalFilesystem::new()))
    }

    /// Scanner over a custom document source
    pub fn with_source(config: ValidatorConfig, source: Arc<dyn DocumentSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Scan every document below `root`.
    ///
    /// Only a missing root or cancellation aborts the scan; per-file
    /// problems are recorded in the summary.
    #[instrument(skip(self, root, cancel), fields(root = %root.display()), name = "corpus_scan")]
    pub fn scan(&self, root: &Path, cancel: &CancellationToken) -> Result<ScanOutput> {
        log::info!("Starting corpus scan for: {:?}", root);

        let filter = ListFilter::new().excluded(self.config.excluded_paths.iter().cloned());
        let listing = self.source.list(root, &filter)?;
        let relative = |path: &Path| path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let files: Vec<PathBuf> = listing.files.iter().map(|path| relative(path)).collect();
        let unreachable: Vec<FileIssue> = listing
            .failures
            .iter()
            .map(|issue| FileIssue::new(relative(&issue.path), issue.reason.clone()))
            .collect();
        let inventory = FileInventory::from_paths(&files);

        let mut documents: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| self.config.is_document(path))
            .collect();
        documents.sort();
        log::info!("Found {} document files", documents.len());

        let outcomes = if documents.len() < self.config.parallel_threshold {
            log::debug!("Scanning sequentially");
            self.scan_sequential(root, &documents, cancel)?
        } else {
            self.scan_parallel(root, &documents, cancel)?
        };

        let (entries, mut summary) = assemble(documents.len(), outcomes);
        if !unreachable.is_empty() {
            summary.skipped.extend(unreachable);
            summary.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        }
        log::info!(
            "Corpus scan complete: {} entries, {} skipped, {} degraded, {} duplicate ids",
            summary.entries,
            summary.skipped.len(),
            summary.degraded.len(),
            summary.duplicate_ids.len()
        );

        Ok(ScanOutput {
            entries,
            inventory,
            summary,
        })
    }

    fn scan_sequential(
        &self,
        root: &Path,
        documents: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<Vec<FileOutcome>> {
        documents
            .iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                Ok(self.scan_file(root, path))
            })
            .collect()
    }

    fn scan_parallel(
        &self,
        root: &Path,
        documents: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<Vec<FileOutcome>> {
        let workers = self.worker_count();
        log::debug!("Scanning in parallel with {} workers", workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("docgraph-scan-{}", idx))
            .build()
            .map_err(|e| Error::other(format!("Failed to start scan workers: {}", e)))?;

        // Indexed collect keeps path order whatever the completion order
        pool.install(|| {
            documents
                .par_iter()
                .map(|path| {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    Ok(self.scan_file(root, path))
                })
                .collect()
        })
    }

    fn worker_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.config.max_workers.min(available).max(1)
    }

    fn scan_file(&self, root: &Path, relative: &Path) -> FileOutcome {
        let full_path = root.join(relative);

        if let Some(size) = self.source.size(&full_path)
            && size > self.config.max_file_size
        {
            log::warn!("Skipping {}: {} bytes exceeds limit", full_path.display(), size);
            return FileOutcome::Skipped(FileIssue::new(
                relative,
                format!(
                    "file is {} bytes, larger than the {} byte limit",
                    size, self.config.max_file_size
                ),
            ));
        }

        let text = match self.source.read(&full_path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read {}: {}", full_path.display(), e);
                return FileOutcome::Skipped(FileIssue::new(relative, e.to_string()));
            }
        };

        match parse_metadata(&text) {
            Ok((metadata, body, offset)) => {
                let entry = Entry::from_metadata(relative.to_path_buf(), metadata, body)
                    .with_body_line_offset(offset);
                log::debug!("Parsed {} as '{}'", relative.display(), entry.id);
                FileOutcome::Parsed(entry)
            }
            Err(e) => {
                log::warn!("Malformed metadata in {}: {}", full_path.display(), e);
                let (body, offset) = body_after_block(&text);
                let reason = e.to_string();
                let entry = Entry::degraded(relative.to_path_buf(), body.to_string(), &reason)
                    .with_body_line_offset(offset);
                FileOutcome::Degraded(entry, FileIssue::new(relative, reason))
            }
        }
    }

    /// Load the files that code references point into.
    ///
    /// `paths` are corpus-relative; duplicates are read once and unreadable
    /// files are left out of the map.
    #[instrument(
        skip(self, root, paths),
        fields(root = %root.display()),
        name = "corpus_read_sources"
    )]
    pub fn read_sources<I>(&self, root: &Path, paths: I) -> HashMap<PathBuf, String>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let unique: BTreeSet<PathBuf> = paths
            .into_iter()
            .filter_map(|p| normalize_relative(&p))
            .collect();

        unique
            .into_iter()
            .filter_map(|relative| match self.source.read(&root.join(&relative)) {
                Ok(text) => Some((relative, text)),
                Err(e) => {
                    log::debug!("Code source {} unavailable: {}", relative.display(), e);
                    None
                }
            })
            .collect()
    }
}

/// Reassemble outcomes (already in path order) into entries and a summary.
///
/// The first entry to claim an id keeps it; later ones are dropped.
fn assemble(discovered: usize, outcomes: Vec<FileOutcome>) -> (Vec<Entry>, ScanSummary) {
    let mut summary = ScanSummary {
        files_discovered: discovered,
        ..Default::default()
    };
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut entries = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        let entry = match outcome {
            FileOutcome::Parsed(entry) => entry,
            FileOutcome::Degraded(entry, issue) => {
                summary.degraded.push(issue);
                entry
            }
            FileOutcome::Skipped(issue) => {
                summary.skipped.push(issue);
                continue;
            }
        };

        if let Some(owner) = owners.get(&entry.id) {
            log::warn!(
                "Duplicate id '{}' in {} (already used by {})",
                entry.id,
                entry.path.display(),
                owner.display()
            );
            summary.duplicate_ids.push(FileIssue::new(
                &entry.path,
                format!(
                    "duplicate id '{}', already used by {}",
                    entry.id,
                    display_path(owner)
                ),
            ));
            continue;
        }
        owners.insert(entry.id.clone(), entry.path.clone());
        entries.push(entry);
    }

    summary.entries = entries.len();
    (entries, summary)
}
