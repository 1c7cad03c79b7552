//! Link analyzer: runs every reference pass over a document body.
//!
//! Fenced code blocks and inline code spans are excluded before any pattern
//! runs, so examples of link syntax inside code are never reported.

use docgraph_core::Link;

use crate::parsers::{code_links, link_utils, plain_links, short_links};

const FENCES: [&str; 2] = ["```", "~~~"];

/// Tracks whether the current line sits inside a fenced code block
#[derive(Debug, Default)]
struct FenceState {
    open: Option<&'static str>,
}

impl FenceState {
    /// Feed one line; returns true when the line must be skipped
    fn skip(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match self.open {
            Some(fence) => {
                if trimmed.starts_with(fence) {
                    self.open = None;
                }
                true
            }
            None => match FENCES.iter().find(|f| trimmed.starts_with(**f)) {
                Some(fence) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }
}

/// Extract draft links from a document body.
///
/// Line numbers are 1-indexed relative to `body`.
///
/// # Example
/// ```
/// use docgraph_parser::extract;
/// use docgraph_core::{LinkKind, LinkStatus};
///
/// let links = extract("See [[Note]] and [api](docs/api.md)", "intro");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].kind, LinkKind::ShortReference);
/// assert_eq!(links[1].kind, LinkKind::PlainReference);
/// assert!(links.iter().all(|l| l.status == LinkStatus::Unresolved));
/// ```
pub fn extract(body: &str, source_id: &str) -> Vec<Link> {
    extract_with_offset(body, source_id, 0)
}

/// Extract draft links, shifting line numbers by `line_offset`.
///
/// Used when `body` starts after a metadata block, so reported lines match
/// the file on disk.
pub fn extract_with_offset(body: &str, source_id: &str, line_offset: usize) -> Vec<Link> {
    let mut fences = FenceState::default();
    let mut links = Vec::new();

    for (idx, line) in body.lines().enumerate() {
        if fences.skip(line) {
            continue;
        }
        let line_number = line_offset + idx + 1;
        let excluded = link_utils::inline_code_spans(line);

        links.extend(plain_links::parse_line(line, line_number, source_id, &excluded));
        links.extend(short_links::parse_line(line, line_number, source_id, &excluded));
        links.extend(code_links::parse_line(line, line_number, source_id, &excluded));
    }

    links.sort_by_key(|link| (link.line_number, link.column));
    links
}
