//! Shared test utilities for stacks-bundler tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway project directory.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Project with a `package.json` carrying the given dependencies.
    pub fn with_dependencies(dependencies: &[&str]) -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        let deps = dependencies
            .iter()
            .map(|name| format!("\"{name}\": \"^1.0.0\""))
            .collect::<Vec<_>>()
            .join(", ");
        project.write(
            "package.json",
            &format!("{{ \"name\": \"app\", \"dependencies\": {{ {deps} }} }}"),
        );
        project
    }

    /// Project without a `package.json`.
    pub fn bare() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Install a minimal CommonJS package under `node_modules`.
    pub fn install_package(&self, name: &str, body: &str) {
        self.write(
            &format!("node_modules/{name}/package.json"),
            &format!("{{ \"name\": \"{name}\", \"version\": \"1.0.0\", \"main\": \"index.js\" }}"),
        );
        self.write(&format!("node_modules/{name}/index.js"), body);
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }
}

/// Assert that `haystack` contains `needle`, printing a preview otherwise.
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected output to contain '{}', but it didn't.\nPreview (first 500 chars): {}",
        needle,
        &haystack[..haystack.len().min(500)]
    );
}
