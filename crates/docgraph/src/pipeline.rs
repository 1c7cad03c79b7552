//! End-to-end validation run: scan, analyze, resolve, validate

use docgraph_core::prelude::*;
use docgraph_graph::{
    KnowledgeValidator, ResolutionIndex, ValidatedCorpus, code_sources_needed, resolve_all,
};
use docgraph_parser::extract_with_offset;
use docgraph_scanner::{ScanOutput, Scanner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Validated entries and the report derived from them
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Entries in path order, links resolved and inbound ids filled in
    pub entries: Vec<Entry>,
    pub report: ValidationReport,
}

/// Wires the stages together for one configuration and document source
#[derive(Clone)]
pub struct Pipeline {
    config: ValidatorConfig,
    source: Arc<dyn DocumentSource>,
}

impl Pipeline {
    /// Pipeline over the local filesystem
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            source: Arc::new(LocalFilesystem::new()),
        }
    }

    /// Read documents through a custom source instead
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every stage over the corpus below `root`.
    ///
    /// Fails only on invalid configuration, a missing root or cancellation.
    #[instrument(skip(self, root, cancel), fields(root = %root.display()), name = "validation_run")]
    pub fn run(&self, root: &Path, cancel: &CancellationToken) -> Result<RunOutput> {
        self.config.validate()?;

        let scanner = Scanner::with_source(self.config.clone(), Arc::clone(&self.source));
        let ScanOutput {
            entries,
            inventory,
            summary,
        } = scanner.scan(root, cancel)?;

        let entries: Vec<Entry> = entries
            .into_iter()
            .map(|entry| {
                let links = extract_with_offset(&entry.body, &entry.id, entry.body_line_offset);
                entry.with_links(links)
            })
            .collect();
        log::debug!(
            "Extracted {} links from {} entries",
            entries.iter().map(|e| e.outbound_links.len()).sum::<usize>(),
            entries.len()
        );

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let needed = code_sources_needed(&entries, &inventory);
        let code_sources = scanner.read_sources(root, needed);
        let index = ResolutionIndex::build(&entries, inventory, code_sources, &self.config);
        let entries = resolve_all(entries, &index);

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let ValidatedCorpus { entries, report } =
            KnowledgeValidator::new(self.config.clone()).validate_with_scan(entries, summary);
        log::info!(
            "Validation finished: passed={} exit_code={}",
            report.passed,
            report.exit_code.code()
        );

        Ok(RunOutput { entries, report })
    }

    /// Run on a blocking thread, giving up after `timeout`.
    ///
    /// On expiry the run is cancelled and `Error::Timeout` is returned.
    pub async fn run_with_timeout(
        self,
        root: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<RunOutput> {
        let root = root.into();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let handle = tokio::task::spawn_blocking(move || self.run(&root, &worker_cancel));

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::other(format!("Validation task failed: {}", e))),
            Err(_) => {
                cancel.cancel();
                log::warn!("Validation exceeded {:?}, cancelling", timeout);
                Err(Error::Timeout {
                    millis: timeout.as_millis(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
