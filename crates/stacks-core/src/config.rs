//! The configuration value handed to the bundler and checker.
//!
//! Loading and validating the configuration file is the caller's job; this
//! module only describes the resolved value.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Resolved project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the application's entry source file, relative to the project root.
    pub main: PathBuf,
}

impl Config {
    /// Create a configuration pointing at the given entry file.
    pub fn new(main: impl Into<PathBuf>) -> Self {
        Self { main: main.into() }
    }

    /// Create from a `serde_json::Value` (for programmatic config from another tool).
    ///
    /// # Example
    ///
    /// ```
    /// use stacks_core::Config;
    /// use serde_json::json;
    ///
    /// let config = Config::from_value(json!({ "main": "stacks/index.ts" })).unwrap();
    /// assert_eq!(config.main.to_str(), Some("stacks/index.ts"));
    /// ```
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Absolute location of the entry file for a project rooted at `root`.
    pub fn entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.main).clean()
    }
}
