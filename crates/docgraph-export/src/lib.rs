//! # Export System
//!
//! Turns a validation run into reports for people and for machines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docgraph_export::{BrokenLinksExporter, MachineRecord, render};
//! # use docgraph_core::prelude::*;
//!
//! # fn example(entries: &[Entry], report: &ValidationReport) -> Result<()> {
//! // Markdown for people
//! let markdown = render(report);
//! println!("{}", markdown);
//!
//! // Nodes, edges, metrics and anomalies for tooling
//! let record = MachineRecord::build(entries, report);
//! println!("{}", record.to_json()?);
//!
//! // Broken links as CSV for spreadsheets
//! let csv = BrokenLinksExporter::to_csv(&report.anomalies.broken_link_details.items);
//! println!("{}", csv);
//! # Ok(())
//! # }
//! ```
//!
//! ## Export Formats
//!
//! ### Markdown
//! - Fixed section order: summary, hub ranking, critical issues, warnings,
//!   statistics, suggested actions
//! - Unreadable or unparsable files listed apart from graph issues
//!
//! ### JSON Export
//! - Pretty-printed for readability
//! - Full structure preserved
//! - Nodes and edges in entry order, so output is stable across runs
//!
//! ### CSV Export
//! - Header row included
//! - Cells quoted only when needed
//! - Suitable for spreadsheets and databases
//!
//! ## Performance Considerations
//!
//! - All exporters run in-memory
//! - No I/O operations within exporters; writing files is up to the caller

pub mod markdown;

pub use markdown::{MarkdownReport, render, suggested_actions};

use docgraph_core::prelude::*;
use docgraph_core::{CSVBuilder, display_path, to_json_string};
use serde::{Deserialize, Serialize};

/// One entry in the machine-readable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub path: String,
    pub title: String,
    pub status: EntryStatus,
    pub tags: Vec<String>,
    pub degraded: bool,
    pub inbound_count: usize,
    pub outbound_count: usize,
}

/// One link in the machine-readable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target_raw: String,
    pub target: Option<String>,
    pub kind: LinkKind,
    pub status: LinkStatus,
    pub line: usize,
}

/// `{nodes, edges, metrics, anomalies}` for downstream tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub metrics: HealthMetrics,
    pub anomalies: AnomalyReport,
}

impl MachineRecord {
    /// Build from validated entries and their report
    pub fn build(entries: &[Entry], report: &ValidationReport) -> Self {
        let nodes = entries
            .iter()
            .map(|entry| NodeRecord {
                id: entry.id.clone(),
                path: display_path(&entry.path),
                title: entry.title.clone(),
                status: entry.status,
                tags: entry.tags.iter().cloned().collect(),
                degraded: entry.is_degraded(),
                inbound_count: report
                    .inbound_index
                    .get(&entry.id)
                    .map_or(0, Vec::len),
                outbound_count: entry.outbound_links.len(),
            })
            .collect();

        let edges = entries
            .iter()
            .flat_map(|entry| entry.outbound_links.iter())
            .map(|link| EdgeRecord {
                source: link.source_id.clone(),
                target_raw: link.target_raw.clone(),
                target: link.target_resolved.clone(),
                kind: link.kind,
                status: link.status,
                line: link.line_number,
            })
            .collect();

        Self {
            nodes,
            edges,
            metrics: report.metrics.clone(),
            anomalies: report.anomalies.clone(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        to_json_string(self, "machine record")
    }
}

/// Health metrics exporter
pub struct HealthMetricsExporter;

impl HealthMetricsExporter {
    /// Export metrics as JSON
    pub fn to_json(metrics: &HealthMetrics) -> Result<String> {
        to_json_string(metrics, "health metrics")
    }

    /// Export metrics as CSV (single row; hubs as `id:count` joined by `|`)
    pub fn to_csv(metrics: &HealthMetrics) -> String {
        let hubs = metrics
            .top_hubs
            .iter()
            .map(|h| format!("{}:{}", h.id, h.inbound_count))
            .collect::<Vec<_>>()
            .join("|");

        CSVBuilder::new(vec![
            "total_nodes",
            "total_links",
            "valid_links",
            "broken_links",
            "unresolved_links",
            "external_links",
            "connectivity_score",
            "link_health_score",
            "overall_score",
            "cycle_count",
            "top_hubs",
        ])
        .add_row_owned(vec![
            metrics.total_nodes.to_string(),
            metrics.total_links.to_string(),
            metrics.valid_links.to_string(),
            metrics.broken_links.to_string(),
            metrics.unresolved_links.to_string(),
            metrics.external_links.to_string(),
            format!("{:.3}", metrics.connectivity_score),
            format!("{:.3}", metrics.link_health_score),
            format!("{:.3}", metrics.overall_score),
            metrics.cycle_count.to_string(),
            hubs,
        ])
        .build()
    }
}

/// Broken links exporter
pub struct BrokenLinksExporter;

impl BrokenLinksExporter {
    /// Export broken links as JSON
    pub fn to_json(details: &[BrokenLinkDetail]) -> Result<String> {
        to_json_string(details, "broken links")
    }

    /// Export broken links as CSV, suggestions joined by `|`
    pub fn to_csv(details: &[BrokenLinkDetail]) -> String {
        details
            .iter()
            .fold(
                CSVBuilder::new(vec![
                    "source_id",
                    "source_path",
                    "line",
                    "target",
                    "status",
                    "suggestions",
                ]),
                |csv, detail| {
                    csv.add_row_owned(vec![
                        detail.source_id.clone(),
                        display_path(&detail.source_path),
                        detail.line_number.to_string(),
                        detail.target_raw.clone(),
                        detail.status.to_string(),
                        detail.suggestions.join("|"),
                    ])
                },
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn sample() -> (Vec<Entry>, ValidationReport) {
        let meta = DocumentMetadata {
            id: Some("a".to_string()),
            tags: ["guide".to_string()].into(),
            ..Default::default()
        };
        let a = Entry::from_metadata(PathBuf::from("docs/a.md"), meta, String::new()).with_links(
            vec![
                Link::draft(LinkKind::ShortReference, "a", "b", 2, 1, "[[b]]")
                    .resolved(Some("b".to_string()), LinkStatus::Valid),
                Link::draft(LinkKind::PlainReference, "a", "gone.md", 4, 3, "[x](gone.md)")
                    .resolved(None, LinkStatus::Broken),
            ],
        );
        let b = Entry::from_metadata(
            PathBuf::from("docs/b.md"),
            DocumentMetadata::default(),
            String::new(),
        );

        let broken = BrokenLinkDetail {
            source_id: "a".to_string(),
            source_path: PathBuf::from("docs/a.md"),
            target_raw: "gone.md".to_string(),
            status: LinkStatus::Broken,
            line_number: 4,
            context: "[x](gone.md)".to_string(),
            suggestions: vec!["b".to_string(), "c, d".to_string()],
        };
        let anomalies = AnomalyReport {
            orphan_ids: Finding::new(Severity::Critical, vec!["a".to_string()]),
            dead_end_ids: Finding::new(Severity::Info, vec!["b".to_string()]),
            broken_link_details: Finding::new(Severity::Critical, vec![broken]),
            unresolved_link_details: Finding::new(Severity::Warning, vec![]),
        };
        let metrics = HealthMetrics {
            total_nodes: 2,
            total_links: 2,
            valid_links: 1,
            broken_links: 1,
            unresolved_links: 0,
            external_links: 0,
            connectivity_score: 100.0,
            link_health_score: 50.0,
            overall_score: 70.0,
            top_hubs: vec![HubEntry {
                id: "b".to_string(),
                inbound_count: 1,
            }],
            cycle_count: 0,
        };
        let mut inbound_index = BTreeMap::new();
        inbound_index.insert("b".to_string(), vec!["a".to_string()]);
        let report = ValidationReport {
            mode: ValidationMode::Lenient,
            passed: true,
            exit_code: ExitCode::Warnings,
            metrics,
            anomalies,
            scan: ScanSummary::default(),
            inbound_index,
        };
        (vec![a, b], report)
    }

    #[test]
    fn test_machine_record() {
        let (entries, report) = sample();
        let record = MachineRecord::build(&entries, &report);

        assert_eq!(record.nodes.len(), 2);
        assert_eq!(record.nodes[0].path, "docs/a.md");
        assert_eq!(record.nodes[0].tags, vec!["guide"]);
        assert_eq!(record.nodes[0].outbound_count, 2);
        assert_eq!(record.nodes[1].inbound_count, 1);
        assert_eq!(record.edges.len(), 2);
        assert_eq!(record.edges[1].status, LinkStatus::Broken);
        assert_eq!(record.edges[1].target, None);

        let json = record.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["nodes", "edges", "metrics", "anomalies"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["edges"][0]["kind"], "short-reference");
        assert_eq!(json, MachineRecord::build(&entries, &report).to_json().unwrap());
    }

    #[test]
    fn test_broken_links_csv() {
        let (_, report) = sample();
        let csv = BrokenLinksExporter::to_csv(&report.anomalies.broken_link_details.items);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "source_id,source_path,line,target,status,suggestions");
        assert_eq!(lines[1], "a,docs/a.md,4,gone.md,broken,\"b|c, d\"");
    }

    #[test]
    fn test_broken_links_json() {
        let (_, report) = sample();
        let details = &report.anomalies.broken_link_details.items;
        let json = BrokenLinksExporter::to_json(details).unwrap();
        assert!(json.contains("gone.md"));
        assert!(json.contains("\"status\": \"broken\""));
    }

    #[test]
    fn test_metrics_csv() {
        let (_, report) = sample();
        let csv = HealthMetricsExporter::to_csv(&report.metrics);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2,2,1,1,0,0,100.000,50.000,70.000,0,b:1");
        assert!(HealthMetricsExporter::to_json(&report.metrics).unwrap().contains("overall_score"));
    }
}
