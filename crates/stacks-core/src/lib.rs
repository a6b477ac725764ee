#![cfg_attr(docsrs, feature(doc_cfg))]

//! # stacks-core
//!
//! Shared inputs for the stacks bundler and type checker.
//!
//! Both components receive the same two things from their caller: a resolved
//! project root and a [`Config`] naming the entry file. This crate holds those
//! inputs together with the project's [`PackageManifest`], the derived
//! [`ExternalPackages`] set and the layout of the hidden state directory
//! ([`StatePaths`]).
//!
//! ```no_run
//! use stacks_core::{Config, PackageManifest, StatePaths, INFRASTRUCTURE_PACKAGE};
//! use std::path::Path;
//!
//! # fn main() -> stacks_core::Result<()> {
//! let root = Path::new("./my-app");
//! let config = Config::new("stacks/index.ts");
//! let manifest = PackageManifest::read(root)?;
//!
//! let externals = manifest.external_packages(INFRASTRUCTURE_PACKAGE);
//! println!("entry: {}", config.entry_path(root).display());
//! println!("output: {}", StatePaths::new(root).stacks_dir().display());
//! println!("externals: {:?}", externals.iter().collect::<Vec<_>>());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod state;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use config::Config;
pub use error::{Error, Result};
pub use manifest::{
    ExternalPackages, INFRASTRUCTURE_PACKAGE, PackageManifest, external_packages, package_name,
};
pub use state::{BUILD_INFO_FILE, STACKS_DIR, STATE_DIR, StatePaths};
