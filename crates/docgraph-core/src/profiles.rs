//! Pre-configured profiles for common validation scenarios
//!
//! - Strict: broken links fail the run
//! - Lenient: report only, never fail
//! - Ci: strict, with a longer hub ranking for dashboards

use crate::config::{ValidationMode, ValidatorConfig};

/// Profile selector for pre-configured runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigProfile {
    /// Broken or ambiguous links fail the run
    Strict,
    /// Surface findings without failing
    Lenient,
    /// Strict, tuned for automated pipelines
    Ci,
}

impl ConfigProfile {
    /// Create a ValidatorConfig from this profile
    pub fn create_config(self) -> ValidatorConfig {
        let mut config = ValidatorConfig::new();

        match self {
            Self::Strict => {
                config.mode = ValidationMode::Strict;
            }

            Self::Lenient => {
                config.mode = ValidationMode::Lenient;
            }

            Self::Ci => {
                config.mode = ValidationMode::Strict;
                config.top_hubs = 10;
                config.max_workers = 2;
            }
        }

        config
    }

    /// Parse profile from string
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            "ci" => Some(Self::Ci),
            _ => None,
        }
    }
}
