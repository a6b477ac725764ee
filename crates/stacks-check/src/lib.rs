#![cfg_attr(docsrs, feature(doc_cfg))]

//! # stacks-check
//!
//! Type analysis of an app's module graph before it is deployed.
//!
//! [`check`] builds a [`Program`] rooted at the configured entry, following
//! imports through plain JavaScript as well as TypeScript, and returns every
//! diagnostic it finds as data. [`format_diagnostics`] turns them into
//! readable blocks with the surrounding source lines.
//!
//! ```no_run
//! use stacks_core::Config;
//! use std::path::Path;
//!
//! let root = Path::new("./my-app");
//! let diagnostics = stacks_check::check(root, &Config::new("stacks/index.ts"));
//!
//! for block in stacks_check::format_diagnostics(&diagnostics) {
//!     eprintln!("{block}\n");
//! }
//! ```
//!
//! Results for unchanged files are kept in `<root>/.sst/tsbuildinfo` and
//! reused by the next check.

mod build_info;
mod check;
mod checker;
mod declarations;
pub mod diagnostic;
pub mod format;
mod globals;
mod imports;
pub mod options;
pub mod program;
mod resolver;

pub use build_info::BuildInfoError;
pub use check::check;
pub use diagnostic::{Diagnostic, DiagnosticCategory, MessageChain, MessageText, SourceFile};
pub use format::{
    ColorChoice, FormatOptions, format_diagnostic, format_diagnostics, format_diagnostics_with,
};
pub use globals::is_known_global;
pub use options::CompilerOptions;
pub use program::{EmitResult, Program};
