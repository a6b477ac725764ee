//! Package manifest parsing and the derived external package set.
//!
//! Only the key sets of the three dependency maps matter here: every declared
//! package is assumed to be present in the execution environment, so the
//! bundler leaves it as a runtime `require` instead of inlining it.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Package that is always external: deployment infrastructure, never shipped
/// with the app code.
pub const INFRASTRUCTURE_PACKAGE: &str = "aws-cdk-lib";

/// Parsed `package.json`, restricted to the dependency maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Production dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<HashMap<String, String>>,
    /// Development dependencies
    #[serde(
        default,
        rename = "devDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub dev_dependencies: Option<HashMap<String, String>>,
    /// Peer dependencies
    #[serde(
        default,
        rename = "peerDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub peer_dependencies: Option<HashMap<String, String>>,
}

impl PackageManifest {
    /// Location of the manifest for a project rooted at `root`.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join("package.json")
    }

    /// Read `package.json` from the project root.
    pub fn read(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        let content = std::fs::read_to_string(&path).map_err(|source| Error::ManifestRead {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&path, &content)
    }

    /// Parse manifest text; `path` is only used for error reporting.
    pub fn from_json(path: &Path, content: &str) -> Result<Self> {
        let manifest: Self =
            serde_json::from_str(content).map_err(|source| Error::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = |map: &Option<HashMap<String, String>>| map.as_ref().map_or(0, HashMap::len);
        tracing::debug!(
            path = %path.display(),
            dependencies = count(&manifest.dependencies),
            dev_dependencies = count(&manifest.dev_dependencies),
            peer_dependencies = count(&manifest.peer_dependencies),
            "parsed package manifest"
        );
        Ok(manifest)
    }

    /// External package set: every declared dependency plus `infrastructure`.
    pub fn external_packages(&self, infrastructure: &str) -> ExternalPackages {
        let mut names = external_packages(
            self.dependencies.as_ref(),
            self.dev_dependencies.as_ref(),
            self.peer_dependencies.as_ref(),
        );
        names.insert(infrastructure.to_string());
        tracing::debug!(
            count = names.len(),
            packages = ?names,
            "external packages"
        );
        ExternalPackages(names)
    }
}

/// Union of the key sets of three optional dependency maps.
pub fn external_packages(
    dependencies: Option<&HashMap<String, String>>,
    dev_dependencies: Option<&HashMap<String, String>>,
    peer_dependencies: Option<&HashMap<String, String>>,
) -> BTreeSet<String> {
    [dependencies, dev_dependencies, peer_dependencies]
        .into_iter()
        .flatten()
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Deduplicated, ordered set of package names excluded from the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalPackages(BTreeSet<String>);

impl ExternalPackages {
    /// Whether an import specifier refers to one of the external packages.
    ///
    /// A package matches its own name and any subpath of it, so `left-pad`
    /// covers `left-pad/lib/index.js` too.
    pub fn matches(&self, specifier: &str) -> bool {
        let package = package_name(specifier);
        !package.is_empty() && self.0.contains(package)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for ExternalPackages {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Package portion of a bare specifier (`@scope/pkg/sub` → `@scope/pkg`).
pub fn package_name(specifier: &str) -> &str {
    let mut slashes = specifier.match_indices('/').map(|(i, _)| i);
    let end = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    match end {
        Some(end) => &specifier[..end],
        None => specifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(names: &[&str]) -> HashMap<String, String> {
        names
            .iter()
            .map(|name| (name.to_string(), "^1.0.0".to_string()))
            .collect()
    }

    #[test]
    fn union_of_all_three_maps_is_deduplicated() {
        let runtime = deps(&["left-pad", "zod"]);
        let dev = deps(&["typescript", "zod"]);
        let peer = deps(&["react"]);

        let names = external_packages(Some(&runtime), Some(&dev), Some(&peer));
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, vec!["left-pad", "react", "typescript", "zod"]);
    }

    #[test]
    fn missing_maps_contribute_nothing() {
        assert!(external_packages(None, None, None).is_empty());
    }

    #[test]
    fn manifest_always_adds_infrastructure_package() {
        let manifest = PackageManifest::default();
        let externals = manifest.external_packages(INFRASTRUCTURE_PACKAGE);
        assert_eq!(externals.len(), 1);
        assert!(externals.contains("aws-cdk-lib"));
    }

    #[test]
    fn parses_dependency_maps_and_ignores_other_fields() {
        let manifest = PackageManifest::from_json(
            Path::new("package.json"),
            r#"{
                "name": "my-app",
                "scripts": { "build": "tsc" },
                "dependencies": { "left-pad": "^1.3.0" },
                "peerDependencies": { "@aws-sdk/client-s3": "*" }
            }"#,
        )
        .unwrap();

        assert!(manifest.dev_dependencies.is_none());
        let externals = manifest.external_packages(INFRASTRUCTURE_PACKAGE);
        let names: Vec<_> = externals.iter().collect();
        assert_eq!(names, vec!["@aws-sdk/client-s3", "aws-cdk-lib", "left-pad"]);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = PackageManifest::from_json(Path::new("/p/package.json"), "{ nope").unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
        assert!(err.to_string().contains("/p/package.json"));
    }

    #[test]
    fn read_reports_missing_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PackageManifest::read(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }

    #[test]
    fn matches_package_and_subpaths() {
        let externals: ExternalPackages = ["left-pad".to_string(), "@aws-sdk/client-s3".to_string()]
            .into_iter()
            .collect();

        assert!(externals.matches("left-pad"));
        assert!(externals.matches("left-pad/lib/index.js"));
        assert!(externals.matches("@aws-sdk/client-s3"));
        assert!(externals.matches("@aws-sdk/client-s3/dist/index.js"));
        assert!(!externals.matches("left-padding"));
        assert!(!externals.matches("@aws-sdk/client-dynamodb"));
        assert!(!externals.matches("./left-pad"));
    }
}
