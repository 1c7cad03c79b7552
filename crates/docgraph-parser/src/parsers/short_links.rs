//! Short reference parser: `[[Note]]`, `[[folder/Note]]`, `[[Note#Heading]]`, `[[Note|Alias]]`
//!
//! Embeds (`![[Note]]`) count as short references. `[[code:...]]` belongs to
//! the code reference pass and same-document anchors (`[[#Heading]]`) are
//! not references to another document.

use docgraph_core::{Link, LinkKind};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::code_links::CODE_PREFIX;
use super::link_utils::{char_column, context_window, in_spans};

/// Matches [[...]] pattern
static SHORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap());

/// Fast pre-filter
#[inline]
fn has_short_reference(line: &str) -> bool {
    line.contains("[[")
}

/// Parse the short references of one line
pub fn parse_line(
    line: &str,
    line_number: usize,
    source_id: &str,
    excluded: &[Range<usize>],
) -> Vec<Link> {
    if !has_short_reference(line) {
        return Vec::new();
    }

    SHORT_PATTERN
        .captures_iter(line)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            if in_spans(excluded, full_match.start()) {
                return None;
            }

            let raw = caps.get(1)?.as_str();
            if raw.trim_start().starts_with(CODE_PREFIX) {
                return None;
            }

            // Handle alias syntax: [[target|alias]]
            let (target, alias) = match raw.split_once('|') {
                Some((target, alias)) => (target.trim(), Some(alias.trim())),
                None => (raw.trim(), None),
            };
            if target.is_empty() || target.starts_with('#') {
                return None;
            }

            let kind = match alias {
                Some(alias) if !alias.is_empty() => LinkKind::AliasedShortReference,
                _ => LinkKind::ShortReference,
            };
            let link = Link::draft(
                kind,
                source_id,
                target,
                line_number,
                char_column(line, full_match.start()),
                context_window(line, full_match.range()),
            );

            Some(match alias {
                Some(alias) if !alias.is_empty() => link.with_label(alias),
                _ => link,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Vec<Link> {
        parse_line(line, 1, "src", &[])
    }

    #[test]
    fn test_simple_short_reference() {
        let links = parse("See [[Note]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_raw, "Note");
        assert_eq!(links[0].kind, LinkKind::ShortReference);
        assert_eq!(links[0].column, 5);
        assert_eq!(links[0].source_id, "src");
    }

    #[test]
    fn test_short_reference_with_folder_and_heading() {
        let links = parse("See [[folder/Note#Heading]]");
        assert_eq!(links[0].target_raw, "folder/Note#Heading");
        assert_eq!(links[0].target_without_fragment(), "folder/Note");
    }

    #[test]
    fn test_multiple_short_references() {
        let links = parse("[[Note1]] and [[Note2]] and [[Note3]]");
        let targets: Vec<_> = links.iter().map(|l| l.target_raw.as_str()).collect();
        assert_eq!(targets, vec!["Note1", "Note2", "Note3"]);
    }

    #[test]
    fn test_aliased_short_reference() {
        let links = parse("See [[capabilities/File Management|File Management]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, LinkKind::AliasedShortReference);
        assert_eq!(links[0].target_raw, "capabilities/File Management");
        assert_eq!(links[0].label.as_deref(), Some("File Management"));
    }

    #[test]
    fn test_empty_alias_is_plain_short_reference() {
        let links = parse("[[Note|]]");
        assert_eq!(links[0].kind, LinkKind::ShortReference);
        assert_eq!(links[0].label, None);
    }

    #[test]
    fn test_embed_is_short_reference() {
        let links = parse("![[Diagram]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_raw, "Diagram");
    }

    #[test]
    fn test_skips_code_and_anchor_forms() {
        assert!(parse("[[code:src/lib.rs]]").is_empty());
        assert!(parse("[[#Heading]]").is_empty());
        assert!(parse("[[|alias only]]").is_empty());
    }

    #[test]
    fn test_respects_excluded_spans() {
        let line = "`[[Hidden]]` and [[Shown]]";
        let links = parse_line(line, 1, "src", &[0..12]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_raw, "Shown");
    }
}
