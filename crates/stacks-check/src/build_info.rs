//! Incremental state persisted between checks.
//!
//! Stores, per file, a BLAKE3 hash of its text together with the
//! [`FileAnalysis`] computed from it. A file whose hash is unchanged is not
//! parsed again. The whole cache is discarded when the options fingerprint
//! or format version differ.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::checker::FileAnalysis;

/// Errors reading or writing the build info file.
#[derive(Debug, thiserror::Error)]
pub enum BuildInfoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("incompatible build info: {0}")]
    Incompatible(String),
}

/// Content hash of a file's text.
pub(crate) fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileEntry {
    pub hash: String,
    pub analysis: FileAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BuildInfo {
    format_version: u32,
    fingerprint: String,
    files: HashMap<PathBuf, FileEntry>,
}

impl BuildInfo {
    /// Bump when the stored layout changes.
    pub const FORMAT_VERSION: u32 = 2;

    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            fingerprint: fingerprint.into(),
            files: HashMap::default(),
        }
    }

    /// Read the build info at `path`.
    ///
    /// Returns `Ok(None)` if there is no file yet. A file written for other
    /// options or by another format version is an [`BuildInfoError::Incompatible`]
    /// error; callers treat every error as a cold start.
    pub fn load(path: &Path, fingerprint: &str) -> Result<Option<Self>, BuildInfoError> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path)?;
        let info: BuildInfo = bincode::deserialize(&bytes)
            .map_err(|e| BuildInfoError::Deserialization(e.to_string()))?;

        if info.format_version != Self::FORMAT_VERSION {
            return Err(BuildInfoError::Incompatible(format!(
                "expected format {}, found {}",
                Self::FORMAT_VERSION,
                info.format_version
            )));
        }
        if info.fingerprint != fingerprint {
            return Err(BuildInfoError::Incompatible(
                "compiler options changed".to_string(),
            ));
        }

        Ok(Some(info))
    }

    /// Write to `path`, creating its directory. Temp file plus rename.
    pub fn save(&self, path: &Path) -> Result<(), BuildInfoError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes =
            bincode::serialize(self).map_err(|e| BuildInfoError::Serialization(e.to_string()))?;

        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// The stored analysis for `path` if its text still hashes to `hash`.
    pub fn get(&self, path: &Path, hash: &str) -> Option<&FileAnalysis> {
        self.files
            .get(path)
            .filter(|entry| entry.hash == hash)
            .map(|entry| &entry.analysis)
    }

    pub fn insert(&mut self, path: PathBuf, hash: String, analysis: FileAnalysis) {
        self.files.insert(path, FileEntry { hash, analysis });
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
