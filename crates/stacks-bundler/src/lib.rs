#![cfg_attr(docsrs, feature(doc_cfg))]

//! # stacks-bundler
//!
//! Bundles an application entry file into a single CommonJS module at a fixed
//! location, using Rolldown.
//!
//! Whatever the entry file is called, the output is always
//! `<root>/.sst/stacks/index.js` (plus `index.js.map`), so downstream code can
//! import the app from one predictable place. Every package declared in the
//! project's `package.json`, and the deployment infrastructure package, stays
//! an external `require` instead of being inlined.
//!
//! ```no_run
//! use stacks_core::Config;
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new("./my-app");
//! stacks_bundler::build(root, &Config::new("stacks/index.ts")).await?;
//!
//! println!("bundle written to {}", stacks_bundler::output_file(root).display());
//! # Ok(()) }
//! ```

pub mod build;
pub mod external_plugin;
pub mod settings;
pub mod writer;

use std::path::PathBuf;

pub use build::{build, build_with, output_file};
pub use external_plugin::ExternalPackagesPlugin;
pub use settings::BuildSettings;

// Re-export core Rolldown types for library users
pub use rolldown::{BundleOutput, OutputFormat, Platform, SourceMapType};

/// Error types for stacks-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured entry file does not exist.
    #[error("Cannot find app handler. Make sure to add a \"{}\" file", main.display())]
    MissingEntry {
        /// `main` exactly as configured.
        main: PathBuf,
        /// Where the entry was looked up.
        expected: PathBuf,
    },

    /// Error from Rolldown, carried verbatim.
    #[error("{0}")]
    Bundler(String),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Error from the foundation crate (package manifest, config).
    #[error(transparent)]
    Core(#[from] stacks_core::Error),
}

/// Result type alias for stacks-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a Rolldown failure without interpreting it.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(format!("{error:?}"))
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::MissingEntry { .. } => "MISSING_ENTRY",
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Core(_) => "CORE_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::MissingEntry { expected, .. } => Some(Box::new(format!(
                "Create '{}' or point \"main\" at an existing file.",
                expected.display()
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it's within the build directory.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Core(inner) => miette::Diagnostic::help(inner),
            Error::Bundler(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn missing_entry_message_names_configured_main() {
        let err = Error::MissingEntry {
            main: PathBuf::from("stacks/index.ts"),
            expected: PathBuf::from("/project/stacks/index.ts"),
        };
        assert_eq!(
            err.to_string(),
            "Cannot find app handler. Make sure to add a \"stacks/index.ts\" file"
        );
        assert_eq!(err.code().unwrap().to_string(), "MISSING_ENTRY");
        assert!(err.help().unwrap().to_string().contains("/project/stacks/index.ts"));
    }

    #[test]
    fn rolldown_failures_are_not_reinterpreted() {
        let err = Error::from_rolldown_batch(&"Unexpected token at line 3");
        assert_eq!(err.to_string(), "\"Unexpected token at line 3\"");
    }
}
