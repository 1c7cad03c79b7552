//! Shared utilities for operations across docgraph crates.
//!
//! Provides DRY helpers for:
//! - Serialization with consistent error handling
//! - CSV building
//! - Lexical path normalization

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Generic JSON serialization with consistent error handling
/// Works with any type that implements Serialize (including slices)
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(|e| {
        Error::serialization_error(format!("Failed to serialize {} as JSON: {}", context, e))
    })
}

/// Generic CSV serialization builder
/// Use the CSVBuilder fluent API to construct and export CSV data
pub struct CSVBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CSVBuilder {
    /// Create a new CSV with headers
    pub fn new(headers: Vec<&str>) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row of data from owned strings
    pub fn add_row_owned(mut self, values: Vec<String>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the CSV string
    pub fn build(self) -> String {
        let mut csv = self.headers.join(",") + "\n";
        for row in self.rows {
            let cells: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }
}

/// Quote a CSV cell when it contains a delimiter, quote or newline
fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Returns `None` when the path climbs above its starting point, so a
/// relative reference can never escape the corpus root.
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::Normal(name) => normalized.push(name),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(normalized)
}

/// Render a relative path with forward slashes on every platform
pub fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_to_json_string() {
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        let json = to_json_string(&data, "test_data").unwrap();
        assert!(json.contains("test"));
        assert!(json.contains("42"));
    }

    #[test]
    fn test_csv_builder_escapes() {
        let csv = CSVBuilder::new(vec!["source", "context"])
            .add_row_owned(vec!["a".to_string(), "see [[b]], \"c\"".to_string()])
            .build();

        assert!(csv.starts_with("source,context\n"));
        assert!(csv.contains("a,\"see [[b]], \"\"c\"\"\""));
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(
            normalize_relative(Path::new("guides/../setup/./install.md")),
            Some(PathBuf::from("setup/install.md"))
        );
        assert_eq!(
            normalize_relative(Path::new("/abs/note.md")),
            Some(PathBuf::from("abs/note.md"))
        );
        assert_eq!(normalize_relative(Path::new("../../etc/passwd")), None);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("a/b/c.md")), "a/b/c.md");
    }
}
