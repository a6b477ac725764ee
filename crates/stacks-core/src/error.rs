//! Error types for stacks-core operations.

use std::path::PathBuf;

/// Errors raised while reading the caller-provided project inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The package manifest could not be read from disk.
    #[error("Failed to read package manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The package manifest is not valid JSON (or has the wrong shape).
    #[error("Invalid package manifest '{}': {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for stacks-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::ManifestRead { .. } => "MANIFEST_READ",
            Error::ManifestParse { .. } => "MANIFEST_PARSE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "The configuration needs a \"main\" field pointing at the app entry file.\nError: {}",
                msg
            ))),
            Error::ManifestRead { path, .. } => Some(Box::new(format!(
                "Make sure '{}' exists at the project root and is readable.",
                path.display()
            ))),
            Error::ManifestParse { .. } => Some(Box::new(
                "Check package.json for syntax errors. Dependency maps must map names to version strings.",
            )),
        }
    }
}
