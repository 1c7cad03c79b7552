//! Configuration for a validation run.
//!
//! Follows a builder pattern for complex configuration with validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Strictness policy for pass/fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Broken or ambiguous links fail the run
    Strict,
    /// Findings are surfaced as warnings only
    #[default]
    Lenient,
}

impl ValidationMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

/// Settings for scanning, resolving and validating a corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub mode: ValidationMode,
    /// Number of hubs kept in the ranking
    pub top_hubs: usize,
    /// Below this many documents the scan runs sequentially
    pub parallel_threshold: usize,
    /// Upper bound on scanner worker threads
    pub max_workers: usize,
    /// Suffixes (with leading dot) of files treated as documents
    pub document_extensions: BTreeSet<String>,
    /// Directory or file names skipped during discovery
    pub excluded_paths: BTreeSet<String>,
    /// Targets starting with one of these are external, not broken
    pub external_prefixes: Vec<String>,
    /// Documents larger than this are skipped
    pub max_file_size: u64,
    /// Minimum similarity (0.0-1.0) for a fix suggestion on a broken link
    pub suggestion_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Lenient,
            top_hubs: 5,
            parallel_threshold: 10,
            max_workers: 4,
            document_extensions: [".md"].iter().map(|s| s.to_string()).collect(),
            excluded_paths: [".git", ".DS_Store", "node_modules", "target"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            external_prefixes: Vec::new(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            suggestion_threshold: 0.6,
        }
    }
}

impl ValidatorConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with builder
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.document_extensions.is_empty() {
            return Err(Error::config_error(
                "At least one document extension must be configured",
            ));
        }

        if let Some(ext) = self.document_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(Error::config_error(format!(
                "Document extension must start with '.': {}",
                ext
            )));
        }

        if self.max_workers == 0 {
            return Err(Error::config_error("max_workers must be at least 1"));
        }

        if !(0.0..=1.0).contains(&self.suggestion_threshold) {
            return Err(Error::config_error(format!(
                "suggestion_threshold must be within 0.0..=1.0, got {}",
                self.suggestion_threshold
            )));
        }

        Ok(())
    }

    /// Whether `path` carries one of the document extensions
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.document_extensions.contains(&format!(".{}", ext)))
    }

    /// Whether `target` matches the external whitelist
    pub fn is_external(&self, target: &str) -> bool {
        self.external_prefixes
            .iter()
            .any(|prefix| target.starts_with(prefix.as_str()))
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;
        config.validate()?;

        Ok(config)
    }
}

/// Builder for ValidatorConfig
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict or lenient mode
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Shorthand for strict mode
    pub fn strict(self, strict: bool) -> Self {
        self.mode(ValidationMode::from_strict(strict))
    }

    pub fn top_hubs(mut self, count: usize) -> Self {
        self.config.top_hubs = count;
        self
    }

    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers;
        self
    }

    /// Add a document extension such as `.markdown`
    pub fn document_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.document_extensions.insert(ext.into());
        self
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_paths.insert(name.into());
        self
    }

    /// Whitelist a target prefix as external
    pub fn external_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.external_prefixes.push(prefix.into());
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn suggestion_threshold(mut self, threshold: f64) -> Self {
        self.config.suggestion_threshold = threshold;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<ValidatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_builder() {
        let config = ValidatorConfig::builder()
            .strict(true)
            .top_hubs(3)
            .external_prefix("doi:")
            .build()
            .unwrap();

        assert_eq!(config.mode, ValidationMode::Strict);
        assert_eq!(config.top_hubs, 3);
        assert!(config.is_external("doi:10.1000/182"));
        assert!(!config.is_external("notes/a.md"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ValidatorConfig::builder().max_workers(0).build().is_err());
        assert!(
            ValidatorConfig::builder()
                .document_extension("txt")
                .build()
                .is_err()
        );
        assert!(
            ValidatorConfig::builder()
                .suggestion_threshold(1.5)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_is_document() {
        let config = ValidatorConfig::default();
        assert!(config.is_document(Path::new("a/b.md")));
        assert!(!config.is_document(Path::new("a/b.rs")));
        assert!(!config.is_document(Path::new("README")));
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docgraph.yaml");
        std::fs::write(&path, "mode: strict\ntop_hubs: 10\n").unwrap();

        let config = ValidatorConfig::load(&path).unwrap();
        assert_eq!(config.mode, ValidationMode::Strict);
        assert_eq!(config.top_hubs, 10);
        assert_eq!(config.parallel_threshold, 10);
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docgraph.yaml");
        std::fs::write(&path, "mode: sometimes\n").unwrap();
        assert!(ValidatorConfig::load(&path).is_err());
    }
}
