//! Metadata block extraction: ---\nYAML\n---
//!
//! The block is parsed into a [`DocumentMetadata`] record. Known keys are
//! type-checked here; every other key is carried over untouched in `extra`.

use docgraph_core::{DocumentMetadata, EntryStatus, Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const DELIMITER: &str = "---";
const ALT_CLOSER: &str = "...";

/// Location of a metadata block inside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBounds<'a> {
    /// YAML between the delimiters
    pub yaml: &'a str,
    /// Byte offset where the body starts
    pub body_offset: usize,
    /// Number of lines before the body
    pub lines_before_body: usize,
}

/// Find the leading metadata block.
///
/// Returns `Ok(None)` when the document has no block and an error when the
/// opening delimiter is never closed.
pub fn split_block(text: &str) -> Result<Option<BlockBounds<'_>>> {
    let text_start = if text.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
    let rest = &text[text_start..];

    let mut lines = rest.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if first.trim_end() != DELIMITER {
        return Ok(None);
    }

    let yaml_start = text_start + first.len();
    let mut offset = yaml_start;
    let mut line_count = 1;
    for line in lines {
        line_count += 1;
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == ALT_CLOSER {
            return Ok(Some(BlockBounds {
                yaml: &text[yaml_start..offset],
                body_offset: offset + line.len(),
                lines_before_body: line_count,
            }));
        }
        offset += line.len();
    }

    Err(Error::malformed_metadata(
        "metadata block opened with '---' is never closed",
    ))
}

/// Body text after the metadata block, or the whole text without one.
///
/// Used for degraded entries, so an unterminated block yields the whole text.
pub fn body_after_block(text: &str) -> (&str, usize) {
    match split_block(text) {
        Ok(Some(bounds)) => (&text[bounds.body_offset..], bounds.lines_before_body),
        _ => (text, 0),
    }
}

/// Parse the metadata block of a document.
///
/// Returns the typed metadata, the body, and the number of lines that
/// precede the body in the original text.
pub fn parse_metadata(text: &str) -> Result<(DocumentMetadata, String, usize)> {
    let Some(bounds) = split_block(text)? else {
        return Ok((DocumentMetadata::default(), text.to_string(), 0));
    };

    let value: Value = serde_yaml::from_str(bounds.yaml)
        .map_err(|e| Error::malformed_metadata(format!("invalid YAML: {}", e)))?;

    let metadata = match value {
        Value::Null => DocumentMetadata::default(),
        Value::Object(map) => typed_metadata(map)?,
        other => {
            return Err(Error::malformed_metadata(format!(
                "metadata must be a mapping, found {}",
                kind_name(&other)
            )));
        }
    };

    Ok((
        metadata,
        text[bounds.body_offset..].to_string(),
        bounds.lines_before_body,
    ))
}

fn typed_metadata(mut map: Map<String, Value>) -> Result<DocumentMetadata> {
    let id = map.remove("id").map(|v| scalar_string("id", v)).transpose()?;
    let title = map
        .remove("title")
        .map(|v| scalar_string("title", v))
        .transpose()?;
    let status = match map.remove("status") {
        Some(v) => scalar_string("status", v)?
            .parse::<EntryStatus>()
            .map_err(Error::malformed_metadata)?,
        None => EntryStatus::default(),
    };
    let tags: BTreeSet<String> = match map.remove("tags") {
        Some(v) => string_list("tags", v)?.into_iter().collect(),
        None => BTreeSet::new(),
    };
    let aliases = match map.remove("aliases") {
        Some(v) => string_list("aliases", v)?,
        None => Vec::new(),
    };

    Ok(DocumentMetadata {
        id,
        title,
        status,
        tags,
        aliases,
        extra: map.into_iter().collect(),
    })
}

fn scalar_string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::malformed_metadata(format!(
            "'{}' must be a string, found {}",
            key,
            kind_name(&other)
        ))),
    }
}

/// Accepts a single string, a comma separated string, or a list of scalars
fn string_list(key: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| scalar_string(key, item))
            .collect(),
        other => Err(Error::malformed_metadata(format!(
            "'{}' must be a string or a list, found {}",
            key,
            kind_name(&other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
