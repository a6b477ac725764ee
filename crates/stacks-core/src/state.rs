//! Layout of the hidden per-project state directory.

use std::path::{Path, PathBuf};

/// Hidden state directory under the project root.
pub const STATE_DIR: &str = ".sst";

/// Build output directory inside [`STATE_DIR`].
pub const STACKS_DIR: &str = "stacks";

/// Incremental type-analysis cache inside [`STATE_DIR`].
pub const BUILD_INFO_FILE: &str = "tsbuildinfo";

/// Paths inside the state directory of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.sst`
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// `<root>/.sst/stacks` - where the bundle is written.
    pub fn stacks_dir(&self) -> PathBuf {
        self.state_dir().join(STACKS_DIR)
    }

    /// `<root>/.sst/tsbuildinfo` - the type checker's incremental cache.
    pub fn build_info_file(&self) -> PathBuf {
        self.state_dir().join(BUILD_INFO_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_hidden_state_dir() {
        let paths = StatePaths::new("/project");
        assert_eq!(paths.stacks_dir(), PathBuf::from("/project/.sst/stacks"));
        assert_eq!(
            paths.build_info_file(),
            PathBuf::from("/project/.sst/tsbuildinfo")
        );
    }
}
