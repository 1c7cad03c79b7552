//! Code reference parser: `[[code:path]]` and `[[code:path::symbol]]`

use docgraph_core::{Link, LinkKind};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::link_utils::{char_column, context_window, in_spans};

/// Prefix that turns a short reference into a code reference
pub const CODE_PREFIX: &str = "code:";

/// Separator between file path and symbol
pub const SYMBOL_SEPARATOR: &str = "::";

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[\s*code:([^\[\]]+)\]\]").unwrap());

/// Parse the code references of one line
pub fn parse_line(
    line: &str,
    line_number: usize,
    source_id: &str,
    excluded: &[Range<usize>],
) -> Vec<Link> {
    if !line.contains("[[") {
        return Vec::new();
    }

    CODE_PATTERN
        .captures_iter(line)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            if in_spans(excluded, full_match.start()) {
                return None;
            }

            let raw = caps.get(1)?.as_str().trim();
            let (path, symbol) = match raw.split_once(SYMBOL_SEPARATOR) {
                Some((path, symbol)) => (path.trim(), Some(symbol.trim())),
                None => (raw, None),
            };
            if path.is_empty() {
                return None;
            }

            let link = Link::draft(
                LinkKind::CodeReference,
                source_id,
                path,
                line_number,
                char_column(line, full_match.start()),
                context_window(line, full_match.range()),
            );

            Some(match symbol {
                Some(symbol) if !symbol.is_empty() => link.with_symbol(symbol),
                _ => link,
            })
        })
        .collect()
}
