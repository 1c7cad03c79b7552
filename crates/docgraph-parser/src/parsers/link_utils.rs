//! Shared utilities for link classification and context snippets.
//!
//! This module provides common functionality used by the individual link
//! passes so they classify targets and cut context the same way.

use docgraph_core::MAX_CONTEXT_LEN;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Characters kept on each side of a match in its context snippet
pub const CONTEXT_RADIUS: usize = 50;

/// Marker for a clipped context edge
pub const ELLIPSIS: &str = "...";

/// `scheme://` prefix of an absolute URL
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").unwrap());

/// Whether a plain-reference target is an absolute network address.
///
/// # Examples
///
/// ```
/// use docgraph_parser::parsers::link_utils::is_network_address;
///
/// assert!(is_network_address("https://example.com/docs"));
/// assert!(is_network_address("mailto:team@example.com"));
/// assert!(is_network_address("//cdn.example.com/a.md"));
/// assert!(!is_network_address("./docs/api.md"));
/// assert!(!is_network_address("setup-guide"));
/// ```
pub fn is_network_address(target: &str) -> bool {
    let target = target.trim();
    URL_SCHEME.is_match(target)
        || target.starts_with("//")
        || target.starts_with("mailto:")
        || target.starts_with("tel:")
}

/// Same-document anchor such as `#installation`
pub fn is_anchor(target: &str) -> bool {
    target.trim_start().starts_with('#')
}

/// Character column (1-indexed) of a byte offset within a line
pub fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count() + 1
}

/// Cut a context snippet of `CONTEXT_RADIUS` characters around `span`.
///
/// Clipped edges are marked with `...`, and the result never exceeds
/// `MAX_CONTEXT_LEN` characters.
///
/// # Examples
///
/// ```
/// use docgraph_parser::parsers::link_utils::context_window;
///
/// let line = "See [[Note]] here";
/// assert_eq!(context_window(line, 4..12), "See [[Note]] here");
/// ```
pub fn context_window(line: &str, span: Range<usize>) -> String {
    let line = line.trim_end_matches(['\r', '\n']);
    let chars: Vec<char> = line.chars().collect();
    let start_char = line[..span.start.min(line.len())].chars().count();
    let end_char = line[..span.end.min(line.len())].chars().count();

    let window_start = start_char.saturating_sub(CONTEXT_RADIUS);
    let window_end = (end_char + CONTEXT_RADIUS).min(chars.len());

    let mut snippet = String::new();
    if window_start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[window_start..window_end]);
    if window_end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }

    if snippet.chars().count() > MAX_CONTEXT_LEN {
        let keep = MAX_CONTEXT_LEN - ELLIPSIS.len();
        snippet = snippet.chars().take(keep).collect::<String>() + ELLIPSIS;
    }
    snippet
}

/// Byte ranges of inline code spans (`` `code` ``) on a line
pub fn inline_code_spans(line: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, ch) in line.char_indices() {
        if ch == '`' {
            match open.take() {
                Some(start) => spans.push(start..idx + 1),
                None => open = Some(idx),
            }
        }
    }
    spans
}

/// Whether `offset` falls inside any of `spans`
pub fn in_spans(spans: &[Range<usize>], offset: usize) -> bool {
    spans.iter().any(|span| span.contains(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_addresses() {
        assert!(is_network_address("http://example.com"));
        assert!(is_network_address("ftp://files.example.com/a"));
        assert!(!is_network_address("docs/http.md"));
        assert!(!is_network_address("code:src/lib.rs"));
    }

    #[test]
    fn test_anchor() {
        assert!(is_anchor("#section"));
        assert!(!is_anchor("note#section"));
    }

    #[test]
    fn test_context_unclipped() {
        let line = "short [[a]] line";
        assert_eq!(context_window(line, 6..11), line);
    }

    #[test]
    fn test_context_clipped_both_edges() {
        let prefix = "x".repeat(80);
        let suffix = "y".repeat(80);
        let line = format!("{}[[target]]{}", prefix, suffix);
        let start = prefix.len();
        let end = start + "[[target]]".len();
        let context = context_window(&line, start..end);

        assert!(context.starts_with("..."));
        assert!(context.ends_with("..."));
        assert!(context.contains("[[target]]"));
        // 3 + 50 + 10 + 50 + 3
        assert_eq!(context.chars().count(), 116);
    }

    #[test]
    fn test_context_is_bounded() {
        let target = "t".repeat(300);
        let line = format!("[[{}]]", target);
        let context = context_window(&line, 0..line.len());
        assert_eq!(context.chars().count(), MAX_CONTEXT_LEN);
        assert!(context.ends_with("..."));
    }

    #[test]
    fn test_context_counts_characters_not_bytes() {
        let line = format!("{}[[ü]]", "é".repeat(60));
        let start = line.find("[[").unwrap();
        let context = context_window(&line, start..line.len());
        assert!(context.starts_with("..."));
        assert_eq!(context.chars().count(), 3 + 50 + 5);
    }

    #[test]
    fn test_inline_code_spans() {
        let line = "use `[[not a link]]` but [[link]]";
        let spans = inline_code_spans(line);
        assert_eq!(spans.len(), 1);
        assert!(in_spans(&spans, line.find("[[not").unwrap()));
        assert!(!in_spans(&spans, line.rfind("[[").unwrap()));
    }

    #[test]
    fn test_char_column() {
        assert_eq!(char_column("ab[[x]]", 2), 3);
        assert_eq!(char_column("éé[[x]]", 4), 3);
    }
}
