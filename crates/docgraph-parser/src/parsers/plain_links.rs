//! Plain reference parser: `[text](target)`, `[text](target "title")`, `[text](<target with spaces>)`
//!
//! Network addresses and same-document anchors are not resolution
//! candidates and are dropped here.

use docgraph_core::{Link, LinkKind};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::link_utils::{char_column, context_window, in_spans, is_anchor, is_network_address};

/// Matches markdown links:
/// - `[text](url)`
/// - `[text](url "title")`
/// - `[text](<url with spaces>)`
///
/// Note: Images (`![alt](url)`) are filtered out after matching.
static PLAIN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[(?P<text>[^\[\]]*(?:\[[^\[\]]*\][^\[\]]*)*)\]\((?:(?P<angle><[^>]+>)|(?P<url>[^()\s"]+))(?:\s+"(?P<title>[^"]*)")?\)"#,
    )
    .unwrap()
});

/// Fast pre-filter: skip regex if no markdown link pattern exists.
#[inline]
fn has_plain_link(line: &str) -> bool {
    line.contains("](")
}

/// Parse the plain references of one line
pub fn parse_line(
    line: &str,
    line_number: usize,
    source_id: &str,
    excluded: &[Range<usize>],
) -> Vec<Link> {
    if !has_plain_link(line) {
        return Vec::new();
    }

    PLAIN_LINK
        .captures_iter(line)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            let start = full_match.start();

            // Skip if preceded by ! (it's an image, not a link)
            if start > 0 && line.as_bytes().get(start - 1) == Some(&b'!') {
                return None;
            }
            if in_spans(excluded, start) {
                return None;
            }

            let text = caps.name("text").map(|m| m.as_str()).unwrap_or("");

            // URL is either in angle brackets or plain
            let target = caps
                .name("angle")
                .map(|m| {
                    let s = m.as_str();
                    &s[1..s.len() - 1]
                })
                .or_else(|| caps.name("url").map(|m| m.as_str()))
                .unwrap_or("")
                .trim();

            if target.is_empty() || is_network_address(target) || is_anchor(target) {
                return None;
            }

            Some(
                Link::draft(
                    LinkKind::PlainReference,
                    source_id,
                    target,
                    line_number,
                    char_column(line, start),
                    context_window(line, full_match.range()),
                )
                .with_label(text),
            )
        })
        .collect()
}
