//! Human-readable Markdown report.
//!
//! Sections always appear in the same order: summary, hub ranking, critical
//! issues, warnings, statistics, suggested actions. Rendering is a pure
//! function of the report, so an unchanged corpus renders byte-identically.

use docgraph_core::prelude::*;
use docgraph_core::display_path;
use std::fmt;

/// Render a validation report as Markdown
pub fn render(report: &ValidationReport) -> String {
    MarkdownReport(report).to_string()
}

/// Markdown view of a report, written section by section
pub struct MarkdownReport<'a>(pub &'a ValidationReport);

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write_header(out, report)?;
        write_summary(out, &report.metrics)?;
        write_hubs(out, &report.metrics.top_hubs)?;
        write_critical(out, &report.anomalies)?;
        write_warnings(out, &report.anomalies, &report.scan)?;
        write_statistics(out, report)?;
        write_actions(out, report)
    }
}

fn write_header(out: &mut fmt::Formatter<'_>, report: &ValidationReport) -> fmt::Result {
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    let mode = match report.mode {
        ValidationMode::Strict => "strict",
        ValidationMode::Lenient => "lenient",
    };
    writeln!(out, "# Knowledge Corpus Validation Report\n")?;
    writeln!(
        out,
        "**Result:** {} | **Mode:** {} | **Exit code:** {}\n",
        verdict,
        mode,
        report.exit_code.code()
    )
}

fn write_summary(out: &mut fmt::Formatter<'_>, metrics: &HealthMetrics) -> fmt::Result {
    writeln!(out, "## Summary\n")?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|---|---|")?;
    let rows: [(&str, String); 10] = [
        ("Entries", metrics.total_nodes.to_string()),
        ("Links (excluding external)", metrics.total_links.to_string()),
        ("Valid links", metrics.valid_links.to_string()),
        ("Broken or ambiguous links", metrics.broken_links.to_string()),
        ("Unresolved links", metrics.unresolved_links.to_string()),
        ("External links", metrics.external_links.to_string()),
        ("Connectivity score", format!("{:.1}", metrics.connectivity_score)),
        ("Link health score", format!("{:.1}", metrics.link_health_score)),
        ("Overall score", format!("{:.1}", metrics.overall_score)),
        ("Cycles", metrics.cycle_count.to_string()),
    ];
    for (label, value) in rows {
        writeln!(out, "| {} | {} |", label, value)?;
    }
    writeln!(out)
}

fn write_hubs(out: &mut fmt::Formatter<'_>, hubs: &[HubEntry]) -> fmt::Result {
    writeln!(out, "## Hub Ranking\n")?;
    if hubs.is_empty() {
        return writeln!(out, "_No entry is referenced by another entry._\n");
    }
    writeln!(out, "| Rank | Entry | Inbound links |")?;
    writeln!(out, "|---|---|---|")?;
    for (rank, hub) in hubs.iter().enumerate() {
        writeln!(out, "| {} | `{}` | {} |", rank + 1, cell(&hub.id), hub.inbound_count)?;
    }
    writeln!(out)
}

fn write_critical(out: &mut fmt::Formatter<'_>, anomalies: &AnomalyReport) -> fmt::Result {
    writeln!(out, "## Critical Issues\n")?;
    let mut any = false;

    if !anomalies.broken_link_details.is_empty() {
        any = true;
        writeln!(
            out,
            "### Broken Links ({}, {})\n",
            anomalies.broken_link_details.len(),
            anomalies.broken_link_details.severity
        )?;
        write_link_table(out, &anomalies.broken_link_details.items)?;
    }

    if anomalies.orphan_ids.severity >= Severity::Error && !anomalies.orphan_ids.is_empty() {
        any = true;
        write_id_list(out, "Orphaned Entries", &anomalies.orphan_ids)?;
    }

    if !any {
        writeln!(out, "_None._\n")?;
    }
    Ok(())
}

fn write_warnings(
    out: &mut fmt::Formatter<'_>,
    anomalies: &AnomalyReport,
    scan: &ScanSummary,
) -> fmt::Result {
    writeln!(out, "## Warnings\n")?;
    let mut any = false;

    if anomalies.orphan_ids.severity == Severity::Warning && !anomalies.orphan_ids.is_empty() {
        any = true;
        write_id_list(out, "Orphaned Entries", &anomalies.orphan_ids)?;
    }

    if !anomalies.unresolved_link_details.is_empty() {
        any = true;
        writeln!(
            out,
            "### Unresolved Links ({}, {})\n",
            anomalies.unresolved_link_details.len(),
            anomalies.unresolved_link_details.severity
        )?;
        write_link_table(out, &anomalies.unresolved_link_details.items)?;
    }

    if scan.has_issues() {
        any = true;
        writeln!(out, "### Files That Could Not Be Read or Parsed\n")?;
        let groups = [
            ("skipped", &scan.skipped),
            ("degraded", &scan.degraded),
            ("duplicate id", &scan.duplicate_ids),
        ];
        for (kind, issues) in groups {
            for issue in issues.iter() {
                writeln!(
                    out,
                    "- `{}` ({}): {}",
                    display_path(&issue.path),
                    kind,
                    single_line(&issue.reason)
                )?;
            }
        }
        writeln!(out)?;
    }

    if !any {
        writeln!(out, "_None._\n")?;
    }
    Ok(())
}

fn write_statistics(out: &mut fmt::Formatter<'_>, report: &ValidationReport) -> fmt::Result {
    let scan = &report.scan;
    let anomalies = &report.anomalies;
    writeln!(out, "## Statistics\n")?;
    writeln!(out, "- Files discovered: {}", scan.files_discovered)?;
    writeln!(out, "- Entries: {}", scan.entries.max(report.metrics.total_nodes))?;
    writeln!(out, "- Skipped files: {}", scan.skipped.len())?;
    writeln!(out, "- Degraded entries: {}", scan.degraded.len())?;
    writeln!(out, "- Duplicate ids: {}", scan.duplicate_ids.len())?;
    writeln!(
        out,
        "- Orphaned entries: {} ({})",
        anomalies.orphan_ids.len(),
        anomalies.orphan_ids.severity
    )?;
    writeln!(
        out,
        "- Dead ends: {} ({})",
        anomalies.dead_end_ids.len(),
        anomalies.dead_end_ids.severity
    )?;
    if !anomalies.dead_end_ids.is_empty() {
        let ids: Vec<String> = anomalies
            .dead_end_ids
            .items
            .iter()
            .map(|id| format!("`{}`", id))
            .collect();
        writeln!(out, "  - {}", ids.join(", "))?;
    }
    writeln!(out, "- Entries with backlinks: {}", report.inbound_index.len())?;
    writeln!(out)
}

fn write_actions(out: &mut fmt::Formatter<'_>, report: &ValidationReport) -> fmt::Result {
    writeln!(out, "## Suggested Actions\n")?;
    let actions = suggested_actions(report);
    if actions.is_empty() {
        return writeln!(out, "No action needed.");
    }
    for (idx, action) in actions.iter().enumerate() {
        writeln!(out, "{}. {}", idx + 1, action)?;
    }
    Ok(())
}

/// Follow-up steps derived from the findings, most urgent first
pub fn suggested_actions(report: &ValidationReport) -> Vec<String> {
    let anomalies = &report.anomalies;
    let scan = &report.scan;
    let mut actions = Vec::new();

    let (ambiguous, broken): (Vec<_>, Vec<_>) = anomalies
        .broken_link_details
        .items
        .iter()
        .partition(|d| d.status == LinkStatus::Ambiguous);
    if !broken.is_empty() {
        actions.push(format!(
            "Fix {} broken link(s); suggestions are listed next to each one.",
            broken.len()
        ));
    }
    if !ambiguous.is_empty() {
        actions.push(format!(
            "Disambiguate {} link(s) that match several titles by linking the canonical id.",
            ambiguous.len()
        ));
    }
    if !scan.degraded.is_empty() {
        actions.push(format!(
            "Repair the metadata block of {} file(s).",
            scan.degraded.len()
        ));
    }
    if !scan.duplicate_ids.is_empty() {
        actions.push(format!(
            "Give each of the {} duplicate file(s) a unique id.",
            scan.duplicate_ids.len()
        ));
    }
    if !scan.skipped.is_empty() {
        actions.push(format!(
            "Make {} skipped file(s) readable or move them out of the corpus.",
            scan.skipped.len()
        ));
    }
    if !anomalies.unresolved_link_details.is_empty() {
        actions.push(format!(
            "Point {} unresolved link(s) at a canonical id or a relative path.",
            anomalies.unresolved_link_details.len()
        ));
    }
    if anomalies.orphan_ids.severity.is_warning_or_worse() && !anomalies.orphan_ids.is_empty() {
        actions.push(format!(
            "Link {} orphaned entr{} from an index or a related entry.",
            anomalies.orphan_ids.len(),
            if anomalies.orphan_ids.len() == 1 { "y" } else { "ies" }
        ));
    }
    actions
}

fn write_link_table(out: &mut fmt::Formatter<'_>, details: &[BrokenLinkDetail]) -> fmt::Result {
    writeln!(out, "| Source | Line | Target | Status | Suggestions | Context |")?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for detail in details {
        let suggestions = if detail.suggestions.is_empty() {
            "-".to_string()
        } else {
            detail
                .suggestions
                .iter()
                .map(|s| format!("`{}`", cell(s)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            out,
            "| `{}` | {} | `{}` | {} | {} | {} |",
            display_path(&detail.source_path),
            detail.line_number,
            cell(&detail.target_raw),
            detail.status,
            suggestions,
            cell(&detail.context)
        )?;
    }
    writeln!(out)
}

fn write_id_list(
    out: &mut fmt::Formatter<'_>,
    title: &str,
    finding: &Finding<String>,
) -> fmt::Result {
    writeln!(out, "### {} ({}, {})\n", title, finding.len(), finding.severity)?;
    for id in &finding.items {
        writeln!(out, "- `{}`", cell(id))?;
    }
    writeln!(out)
}

/// Make text safe for a table cell
fn cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
