//! Validation results: health metrics, anomalies and the overall verdict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::config::ValidationMode;
use crate::models::LinkStatus;

/// Severity level for a category of findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message (not a problem)
    Info,
    /// Warning (should be addressed but not critical)
    Warning,
    /// Error (should be fixed)
    Error,
    /// Critical error (must be fixed)
    Critical,
}

impl Severity {
    /// Anything above informational
    pub fn is_warning_or_worse(&self) -> bool {
        *self >= Self::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Process exit code for the calling automation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitCode {
    Success,
    Warnings,
    StrictFailure,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Warnings => 1,
            Self::StrictFailure => 2,
        }
    }
}

/// An entry and its number of distinct referencing entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntry {
    pub id: String,
    pub inbound_count: usize,
}

/// Structural health of the link graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub total_nodes: usize,
    /// Links that take part in scoring (external links excluded)
    pub total_links: usize,
    pub valid_links: usize,
    /// Broken plus ambiguous links
    pub broken_links: usize,
    pub unresolved_links: usize,
    pub external_links: usize,
    pub connectivity_score: f64,
    pub link_health_score: f64,
    pub overall_score: f64,
    pub top_hubs: Vec<HubEntry>,
    /// Strongly connected components with more than one entry
    pub cycle_count: usize,
}

/// A failing link with enough detail to fix it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLinkDetail {
    pub source_id: String,
    pub source_path: PathBuf,
    pub target_raw: String,
    pub status: LinkStatus,
    pub line_number: usize,
    pub context: String,
    pub suggestions: Vec<String>,
}

/// A group of findings sharing a severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding<T> {
    pub severity: Severity,
    pub items: Vec<T>,
}

impl<T> Finding<T> {
    pub fn new(severity: Severity, items: Vec<T>) -> Self {
        Self { severity, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Graph integrity issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub orphan_ids: Finding<String>,
    pub dead_end_ids: Finding<String>,
    pub broken_link_details: Finding<BrokenLinkDetail>,
    pub unresolved_link_details: Finding<BrokenLinkDetail>,
}

impl AnomalyReport {
    /// Highest severity among non-empty categories
    pub fn max_severity(&self) -> Option<Severity> {
        [
            (self.orphan_ids.is_empty(), self.orphan_ids.severity),
            (self.dead_end_ids.is_empty(), self.dead_end_ids.severity),
            (
                self.broken_link_details.is_empty(),
                self.broken_link_details.severity,
            ),
            (
                self.unresolved_link_details.is_empty(),
                self.unresolved_link_details.severity,
            ),
        ]
        .into_iter()
        .filter(|(empty, _)| !empty)
        .map(|(_, severity)| severity)
        .max()
    }
}

/// A file the scanner could not turn into a healthy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIssue {
    pub path: PathBuf,
    pub reason: String,
}

impl FileIssue {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Per-file problems met while scanning, kept apart from graph issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files_discovered: usize,
    pub entries: usize,
    /// Unreadable files, not part of the corpus
    pub skipped: Vec<FileIssue>,
    /// Entries whose metadata block was rejected
    pub degraded: Vec<FileIssue>,
    /// Later files repeating an id already taken, not part of the corpus
    pub duplicate_ids: Vec<FileIssue>,
}

impl ScanSummary {
    /// Whether any file could not be read or parsed cleanly
    pub fn has_issues(&self) -> bool {
        !self.skipped.is_empty() || !self.degraded.is_empty() || !self.duplicate_ids.is_empty()
    }
}

/// Aggregated outcome of a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub mode: ValidationMode,
    pub passed: bool,
    pub exit_code: ExitCode,
    pub metrics: HealthMetrics,
    pub anomalies: AnomalyReport,
    pub scan: ScanSummary,
    /// Target id to referencing ids
    pub inbound_index: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// Derive pass/fail and the exit code from the findings.
    ///
    /// Strict mode fails whenever a broken or ambiguous link exists. Any
    /// warning-level finding, or any file-level problem, yields `Warnings`.
    pub fn verdict(
        mode: ValidationMode,
        anomalies: &AnomalyReport,
        scan: &ScanSummary,
    ) -> (bool, ExitCode) {
        let has_broken = !anomalies.broken_link_details.is_empty();
        if mode == ValidationMode::Strict && has_broken {
            return (false, ExitCode::StrictFailure);
        }
        let warned = anomalies
            .max_severity()
            .is_some_and(|s| s.is_warning_or_worse())
            || scan.has_issues();
        if warned {
            (true, ExitCode::Warnings)
        } else {
            (true, ExitCode::Success)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomalies(broken: usize, orphans: usize) -> AnomalyReport {
        let detail = BrokenLinkDetail {
            source_id: "x".to_string(),
            source_path: PathBuf::from("x.md"),
            target_raw: "missing".to_string(),
            status: LinkStatus::Broken,
            line_number: 1,
            context: "[[missing]]".to_string(),
            suggestions: vec![],
        };
        AnomalyReport {
            orphan_ids: Finding::new(
                Severity::Warning,
                (0..orphans).map(|i| format!("o{}", i)).collect(),
            ),
            dead_end_ids: Finding::new(Severity::Info, vec!["d".to_string()]),
            broken_link_details: Finding::new(Severity::Critical, vec![detail; broken]),
            unresolved_link_details: Finding::new(Severity::Warning, vec![]),
        }
    }

    #[test]
    fn test_strict_failure() {
        let (passed, code) = ValidationReport::verdict(
            ValidationMode::Strict,
            &anomalies(1, 0),
            &ScanSummary::default(),
        );
        assert!(!passed);
        assert_eq!(code.code(), 2);
    }

    #[test]
    fn test_lenient_only_warns() {
        let (passed, code) = ValidationReport::verdict(
            ValidationMode::Lenient,
            &anomalies(1, 0),
            &ScanSummary::default(),
        );
        assert!(passed);
        assert_eq!(code, ExitCode::Warnings);
    }

    #[test]
    fn test_dead_ends_alone_succeed() {
        let (passed, code) = ValidationReport::verdict(
            ValidationMode::Strict,
            &anomalies(0, 0),
            &ScanSummary::default(),
        );
        assert!(passed);
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn test_scan_issues_warn() {
        let scan = ScanSummary {
            skipped: vec![FileIssue::new("a.md", "permission denied")],
            ..Default::default()
        };
        let (_, code) = ValidationReport::verdict(ValidationMode::Strict, &anomalies(0, 0), &scan);
        assert_eq!(code, ExitCode::Warnings);
    }

    #[test]
    fn test_max_severity_skips_empty_categories() {
        let report = anomalies(0, 2);
        assert_eq!(report.max_severity(), Some(Severity::Warning));
    }
}
