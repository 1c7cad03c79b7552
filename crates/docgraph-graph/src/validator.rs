//! Knowledge validation: graph inversion, health metrics and anomalies.
//!
//! Takes resolved entries, derives their backlinks, and turns the link
//! graph into a [`ValidationReport`]. Runs single-threaded over in-memory
//! values, so the same entries always give the same report.

use crate::graph::LinkGraph;
use crate::resolver::normalize_title;
use docgraph_core::prelude::*;
use std::cmp::Ordering;

/// Weight of connectivity in the overall score
pub const CONNECTIVITY_WEIGHT: f64 = 0.4;
/// Weight of link health in the overall score
pub const LINK_HEALTH_WEIGHT: f64 = 0.6;
/// Most suggestions attached to one failing link
pub const MAX_SUGGESTIONS: usize = 3;

/// Orphan ratio thresholds
const ORPHAN_ERROR_RATIO: f64 = 0.10;
const ORPHAN_CRITICAL_RATIO: f64 = 0.30;

/// Entries with backlinks filled in, plus the report about them
#[derive(Debug, Clone)]
pub struct ValidatedCorpus {
    pub entries: Vec<Entry>,
    pub report: ValidationReport,
}

/// Computes health metrics and anomalies for a resolved corpus
#[derive(Debug, Clone, Default)]
pub struct KnowledgeValidator {
    config: ValidatorConfig,
}

impl KnowledgeValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate resolved entries
    pub fn validate(&self, entries: Vec<Entry>) -> ValidatedCorpus {
        self.validate_with_scan(entries, ScanSummary::default())
    }

    /// Validate resolved entries, folding the scan's file-level issues into
    /// the verdict
    pub fn validate_with_scan(
        &self,
        mut entries: Vec<Entry>,
        scan: ScanSummary,
    ) -> ValidatedCorpus {
        let inbound = InboundIndex::build(&entries);
        inbound.apply(&mut entries);

        let graph = LinkGraph::build(&entries);
        let metrics = self.metrics(&entries, &inbound, &graph);
        let anomalies = self.anomalies(&entries, &inbound);
        let (passed, exit_code) = ValidationReport::verdict(self.config.mode, &anomalies, &scan);

        log::info!(
            "Validated {} entries: {} links, {} broken, overall score {:.1}",
            metrics.total_nodes,
            metrics.total_links,
            metrics.broken_links,
            metrics.overall_score
        );

        let report = ValidationReport {
            mode: self.config.mode,
            passed,
            exit_code,
            metrics,
            anomalies,
            scan,
            inbound_index: inbound.into_map(),
        };

        ValidatedCorpus { entries, report }
    }

    fn metrics(
        &self,
        entries: &[Entry],
        inbound: &InboundIndex,
        graph: &LinkGraph,
    ) -> HealthMetrics {
        let links = || entries.iter().flat_map(|e| e.outbound_links.iter());
        let count = |status: LinkStatus| links().filter(|l| l.status == status).count();

        let external_links = count(LinkStatus::External);
        let total_links = links().count() - external_links;
        let valid_links = count(LinkStatus::Valid);
        let broken_links = links().filter(|l| l.status.is_failure()).count();
        let unresolved_links = count(LinkStatus::Unresolved);

        let connectivity_score = if entries.is_empty() {
            0.0
        } else {
            let connected = entries.iter().filter(|e| graph.is_connected(&e.id)).count();
            100.0 * connected as f64 / entries.len() as f64
        };
        let link_health_score = if total_links == 0 {
            100.0
        } else {
            100.0 * valid_links as f64 / total_links as f64
        };
        let overall_score =
            CONNECTIVITY_WEIGHT * connectivity_score + LINK_HEALTH_WEIGHT * link_health_score;

        HealthMetrics {
            total_nodes: entries.len(),
            total_links,
            valid_links,
            broken_links,
            unresolved_links,
            external_links,
            connectivity_score,
            link_health_score,
            overall_score,
            top_hubs: top_hubs(inbound, self.config.top_hubs),
            cycle_count: graph.cycle_count(),
        }
    }

    fn anomalies(&self, entries: &[Entry], inbound: &InboundIndex) -> AnomalyReport {
        let orphans: Vec<String> = entries
            .iter()
            .filter(|e| inbound.inbound_count(&e.id) == 0)
            .map(|e| e.id.clone())
            .collect();
        let orphan_severity = orphan_severity(orphans.len(), entries.len());

        let dead_ends: Vec<String> = entries
            .iter()
            .filter(|e| e.internal_links().next().is_none())
            .map(|e| e.id.clone())
            .collect();

        let suggestions = SuggestionIndex::build(entries);
        let mut broken = Vec::new();
        let mut unresolved = Vec::new();
        for entry in entries {
            for link in &entry.outbound_links {
                if link.status.is_failure() {
                    broken.push(self.detail(entry, link, &suggestions));
                } else if link.status == LinkStatus::Unresolved {
                    unresolved.push(self.detail(entry, link, &suggestions));
                }
            }
        }

        AnomalyReport {
            orphan_ids: Finding::new(orphan_severity, orphans),
            dead_end_ids: Finding::new(Severity::Info, dead_ends),
            broken_link_details: Finding::new(Severity::Critical, broken),
            unresolved_link_details: Finding::new(Severity::Warning, unresolved),
        }
    }

    fn detail(
        &self,
        entry: &Entry,
        link: &Link,
        suggestions: &SuggestionIndex,
    ) -> BrokenLinkDetail {
        BrokenLinkDetail {
            source_id: entry.id.clone(),
            source_path: entry.path.clone(),
            target_raw: link.target_raw.clone(),
            status: link.status,
            line_number: link.line_number,
            context: link.context.clone(),
            suggestions: suggestions.suggest(
                link.target_without_fragment(),
                &entry.id,
                self.config.suggestion_threshold,
            ),
        }
    }
}

/// Orphan severity from the share of entries nobody links to
pub fn orphan_severity(orphans: usize, total: usize) -> Severity {
    if orphans == 0 || total == 0 {
        return Severity::Info;
    }
    let ratio = orphans as f64 / total as f64;
    if ratio < ORPHAN_ERROR_RATIO {
        Severity::Warning
    } else if ratio < ORPHAN_CRITICAL_RATIO {
        Severity::Error
    } else {
        Severity::Critical
    }
}

/// Entries with at least one backlink, most referenced first, ties by id
pub fn top_hubs(inbound: &InboundIndex, limit: usize) -> Vec<HubEntry> {
    let mut hubs: Vec<HubEntry> = inbound
        .as_map()
        .iter()
        .filter(|(_, sources)| !sources.is_empty())
        .map(|(id, sources)| HubEntry {
            id: id.clone(),
            inbound_count: sources.len(),
        })
        .collect();
    hubs.sort_by(|a, b| {
        b.inbound_count
            .cmp(&a.inbound_count)
            .then_with(|| a.id.cmp(&b.id))
    });
    hubs.truncate(limit);
    hubs
}

/// Normalized id and title of every entry, computed once per validation
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    candidates: Vec<(String, Vec<String>)>,
}

impl SuggestionIndex {
    pub fn build(entries: &[Entry]) -> Self {
        let candidates = entries
            .iter()
            .map(|e| {
                let mut names: Vec<String> = [e.id.as_str(), e.title.as_str()]
                    .into_iter()
                    .map(normalize_title)
                    .filter(|name| !name.is_empty())
                    .collect();
                names.dedup();
                (e.id.clone(), names)
            })
            .collect();
        Self { candidates }
    }

    /// Closest entry ids for a failing target, by normalized Levenshtein
    /// similarity against each entry's id and title. Best first, ties by id.
    pub fn suggest(&self, target: &str, source_id: &str, threshold: f64) -> Vec<String> {
        let wanted = normalize_title(target);
        if wanted.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .candidates
            .iter()
            .filter(|(id, _)| id != source_id)
            .map(|(id, names)| {
                let score = names
                    .iter()
                    .map(|name| strsim::normalized_levenshtein(&wanted, name))
                    .fold(0.0_f64, f64::max);
                (score, id.as_str())
            })
            .filter(|(score, _)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, id)| id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(id: &str, title: Option<&str>, links: Vec<(&str, LinkStatus)>) -> Entry {
        let meta = DocumentMetadata {
            id: Some(id.to_string()),
            title: title.map(str::to_string),
            ..Default::default()
        };
        let links = links
            .into_iter()
            .map(|(target, status)| {
                let resolved = (status == LinkStatus::Valid).then(|| target.to_string());
                Link::draft(LinkKind::ShortReference, id, target, 3, 1, format!("[[{}]]", target))
                    .resolved(resolved, status)
            })
            .collect();
        Entry::from_metadata(PathBuf::from(format!("{}.md", id)), meta, String::new())
            .with_links(links)
    }

    fn validator(strict: bool) -> KnowledgeValidator {
        KnowledgeValidator::new(ValidatorConfig::builder().strict(strict).build().unwrap())
    }

    #[test]
    fn test_chain_inversion() {
        let entries = vec![
            entry("a", None, vec![("b", LinkStatus::Valid)]),
            entry("b", None, vec![("c", LinkStatus::Valid)]),
            entry("c", None, vec![]),
        ];
        let corpus = validator(false).validate(entries);
        let report = &corpus.report;

        assert_eq!(report.inbound_index.len(), 2);
        assert_eq!(report.inbound_index["b"], vec!["a"]);
        assert_eq!(report.inbound_index["c"], vec!["b"]);
        assert_eq!(report.anomalies.orphan_ids.items, vec!["a"]);
        assert_eq!(report.anomalies.dead_end_ids.items, vec!["c"]);
        assert!(report.anomalies.broken_link_details.is_empty());
        assert_eq!(corpus.entries[1].inbound_ids().to_vec(), vec!["a".to_string()]);
        assert_eq!(report.metrics.connectivity_score, 100.0);
        assert_eq!(report.metrics.link_health_score, 100.0);
        assert_eq!(report.metrics.overall_score, 100.0);
    }

    #[test]
    fn test_broken_link_fails_strict() {
        let entries = vec![
            entry("x", None, vec![("missing", LinkStatus::Broken)]),
            entry("y", None, vec![("x", LinkStatus::Valid)]),
        ];
        let report = validator(true).validate(entries).report;

        let broken = &report.anomalies.broken_link_details;
        assert_eq!(broken.len(), 1);
        assert_eq!(broken.severity, Severity::Critical);
        assert_eq!(broken.items[0].source_id, "x");
        assert_eq!(broken.items[0].line_number, 3);
        assert!(!report.passed);
        assert_eq!(report.exit_code, ExitCode::StrictFailure);
        assert_eq!(report.exit_code.code(), 2);
        assert_eq!(report.metrics.link_health_score, 50.0);
    }

    #[test]
    fn test_lenient_mode_never_fails() {
        let entries = vec![entry("x", None, vec![("missing", LinkStatus::Broken)])];
        let report = validator(false).validate(entries).report;
        assert!(report.passed);
        assert_eq!(report.exit_code, ExitCode::Warnings);
    }

    #[test]
    fn test_zero_links_scores() {
        let report = validator(false)
            .validate(vec![entry("a", None, vec![]), entry("b", None, vec![])])
            .report;
        assert_eq!(report.metrics.link_health_score, 100.0);
        assert_eq!(report.metrics.connectivity_score, 0.0);
        assert_eq!(report.metrics.total_links, 0);
    }

    #[test]
    fn test_empty_corpus() {
        let report = validator(true).validate(Vec::new()).report;
        assert_eq!(report.metrics.total_nodes, 0);
        assert_eq!(report.metrics.connectivity_score, 0.0);
        assert_eq!(report.metrics.link_health_score, 100.0);
        assert!(report.metrics.top_hubs.is_empty());
        assert_eq!(report.anomalies.orphan_ids.severity, Severity::Info);
        assert!(report.passed);
        assert_eq!(report.exit_code, ExitCode::Success);
    }

    #[test]
    fn test_external_links_do_not_count() {
        let entries = vec![
            entry("a", None, vec![("jira:1", LinkStatus::External), ("b", LinkStatus::Valid)]),
            entry("b", None, vec![("jira:2", LinkStatus::External)]),
        ];
        let report = validator(false).validate(entries).report;
        assert_eq!(report.metrics.external_links, 2);
        assert_eq!(report.metrics.total_links, 1);
        assert_eq!(report.metrics.link_health_score, 100.0);
        assert_eq!(report.anomalies.dead_end_ids.items, vec!["b"]);
    }

    #[test]
    fn test_unresolved_links_are_warnings() {
        let entries = vec![entry("a", None, vec![("somewhere", LinkStatus::Unresolved)])];
        let report = validator(true).validate(entries).report;
        assert_eq!(report.metrics.unresolved_links, 1);
        assert_eq!(report.anomalies.unresolved_link_details.severity, Severity::Warning);
        assert!(report.anomalies.broken_link_details.is_empty());
        assert!(report.passed);
        assert_eq!(report.exit_code, ExitCode::Warnings);
    }

    #[test]
    fn test_duplicate_sources_and_self_links() {
        let entries = vec![
            entry(
                "a",
                None,
                vec![("b", LinkStatus::Valid), ("b", LinkStatus::Valid), ("a", LinkStatus::Valid)],
            ),
            entry("b", None, vec![]),
        ];
        let report = validator(false).validate(entries).report;
        assert_eq!(report.inbound_index["b"], vec!["a"]);
        assert!(!report.inbound_index.contains_key("a"));
        assert_eq!(report.anomalies.orphan_ids.items, vec!["a"]);
    }

    #[test]
    fn test_top_hubs_ranking() {
        let entries = vec![
            entry("a", None, vec![("hub", LinkStatus::Valid), ("zeta", LinkStatus::Valid)]),
            entry("b", None, vec![("hub", LinkStatus::Valid), ("alpha", LinkStatus::Valid)]),
            entry("c", None, vec![("hub", LinkStatus::Valid)]),
            entry("hub", None, vec![]),
            entry("alpha", None, vec![]),
            entry("zeta", None, vec![]),
        ];
        let config = ValidatorConfig::builder().top_hubs(2).build().unwrap();
        let report = KnowledgeValidator::new(config).validate(entries).report;
        let hubs: Vec<_> = report
            .metrics
            .top_hubs
            .iter()
            .map(|h| (h.id.as_str(), h.inbound_count))
            .collect();
        assert_eq!(hubs, vec![("hub", 3), ("alpha", 1)]);
    }

    #[test]
    fn test_orphan_severity_bands() {
        assert_eq!(orphan_severity(0, 10), Severity::Info);
        assert_eq!(orphan_severity(1, 20), Severity::Warning);
        assert_eq!(orphan_severity(1, 10), Severity::Error);
        assert_eq!(orphan_severity(2, 10), Severity::Error);
        assert_eq!(orphan_severity(3, 10), Severity::Critical);
    }

    #[test]
    fn test_suggestions() {
        let entries = vec![
            entry("setup-guide", Some("Setup Guide"), vec![]),
            entry("release-notes", None, vec![]),
            entry("x", None, vec![]),
        ];
        let index = SuggestionIndex::build(&entries);
        assert_eq!(index.suggest("Setup Guid", "x", 0.6), vec!["setup-guide"]);
        assert!(index.suggest("zzz", "x", 0.6).is_empty());
        assert!(index.suggest("setup-guide", "setup-guide", 0.6).is_empty());
    }

    #[test]
    fn test_suggestion_ranking() {
        let entries = vec![
            entry("c-guides", Some("Setup Guides"), vec![]),
            entry("b-guides", Some("Setup Guides"), vec![]),
            entry("release-notes", None, vec![]),
            entry("a-guides", Some("Setup Guides"), vec![]),
            entry("setup-guide", Some("Setup Guide"), vec![]),
        ];
        let index = SuggestionIndex::build(&entries);
        assert_eq!(
            index.suggest("Setup Guide", "x", 0.6),
            vec!["setup-guide", "a-guides", "b-guides"]
        );
    }

    #[test]
    fn test_ambiguous_links_suggest_candidates() {
        let entries = vec![
            entry("setup-linux", Some("Setup Guide"), vec![]),
            entry("setup-macos", Some("Setup Guide"), vec![]),
            entry("readme", None, vec![("Setup Guide", LinkStatus::Ambiguous)]),
        ];
        let report = validator(true).validate(entries).report;
        let detail = &report.anomalies.broken_link_details.items[0];
        assert_eq!(detail.status, LinkStatus::Ambiguous);
        assert_eq!(detail.suggestions, vec!["setup-linux", "setup-macos"]);
        assert_eq!(report.exit_code, ExitCode::StrictFailure);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let build = || {
            vec![
                entry("a", None, vec![("b", LinkStatus::Valid), ("gone", LinkStatus::Broken)]),
                entry("b", None, vec![("a", LinkStatus::Valid)]),
                entry("c", None, vec![]),
            ]
        };
        let first = validator(false).validate(build()).report;
        let second = validator(false).validate(build()).report;
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first, second);
        assert_eq!(first.metrics.cycle_count, 1);
    }

    #[test]
    fn test_scan_issues_raise_warnings() {
        let scan = ScanSummary {
            skipped: vec![FileIssue::new("bad.md", "unreadable")],
            ..Default::default()
        };
        let entries = vec![
            entry("a", None, vec![("b", LinkStatus::Valid)]),
            entry("b", None, vec![("a", LinkStatus::Valid)]),
        ];
        let report = validator(false).validate_with_scan(entries, scan).report;
        assert_eq!(report.exit_code, ExitCode::Warnings);
        assert_eq!(report.scan.skipped.len(), 1);
    }
}
