//! Configuration for extension autoloading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AutoloadError, AutoloadResult};
use crate::extension::Extension;

/// Which extensions to load, and how.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoloadConfig {
    /// Extensions to register, in registration order.
    pub extensions: Vec<Extension>,
    /// Check the running CPU against the SIMD paths compiled into sqlite-vec.
    pub verify_cpu_features: bool,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            extensions: Extension::ALL.to_vec(),
            verify_cpu_features: true,
            log_filter: "info".to_string(),
        }
    }
}

impl AutoloadConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension list.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Enable or disable the CPU check.
    #[must_use]
    pub const fn with_cpu_verification(mut self, verify: bool) -> Self {
        self.verify_cpu_features = verify;
        self
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the config is invalid.
    pub fn from_json_str(json: &str) -> AutoloadResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is malformed, or is invalid.
    pub fn from_path<P: AsRef<Path>>(path: P) -> AutoloadResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if no extension is listed or one is listed twice.
    pub fn validate(&self) -> AutoloadResult<()> {
        if self.extensions.is_empty() {
            return Err(AutoloadError::InvalidConfig(
                "extensions must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.extensions.len());
        for extension in &self.extensions {
            if !seen.insert(extension) {
                return Err(AutoloadError::InvalidConfig(format!(
                    "extension {extension} is listed more than once"
                )));
            }
        }

        if self.log_filter.trim().is_empty() {
            return Err(AutoloadError::InvalidConfig(
                "log_filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
