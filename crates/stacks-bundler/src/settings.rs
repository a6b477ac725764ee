//! Bundler tunables.
//!
//! [`build`](crate::build) always uses [`BuildSettings::default`]; the values
//! are exposed so the fixed output contract is visible in one place.

use std::path::{Path, PathBuf};

use stacks_core::{INFRASTRUCTURE_PACKAGE, StatePaths};

/// Settings applied to every bundling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Stem of the output file (`index` → `index.js`, `index.js.map`).
    pub entry_name: String,

    /// Minimum runtime version the output must run on.
    pub target: String,

    /// Package that is always external, whether or not the manifest lists it.
    pub infrastructure_package: String,

    /// Emit a `.map` file next to the bundle (default: true).
    pub sourcemap: bool,

    /// Preserve original function and class names (default: true).
    pub keep_names: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            entry_name: "index".to_string(),
            target: "node14".to_string(),
            infrastructure_package: INFRASTRUCTURE_PACKAGE.to_string(),
            sourcemap: true,
            keep_names: true,
        }
    }
}

impl BuildSettings {
    /// Output file name, independent of the entry file's own name.
    pub fn output_file_name(&self) -> String {
        format!("{}.js", self.entry_name)
    }

    /// Directory the bundle is written into.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        StatePaths::new(root).stacks_dir()
    }

    /// Full path of the bundle for a project rooted at `root`.
    pub fn output_file(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(self.output_file_name())
    }
}
