//! Pipeline configuration.
//!
//! Every component takes the configuration by reference at the call site;
//! nothing reads process-global state, so tests can point the pipeline at
//! synthetic roots.

use crate::error::{ReconstructError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filesystem roots used by the reconstruction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructorConfig {
    /// Read-only root under which outer archives are partitioned by year,
    /// e.g. `<archive_root>/2016/I20160526.tar`.
    pub archive_root: PathBuf,

    /// Writable root for transient extraction directories. One scratch
    /// directory is created per invocation and removed when it finishes.
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,
}

fn default_scratch_root() -> PathBuf {
    std::env::temp_dir()
}

impl ReconstructorConfig {
    /// Configuration rooted at `archive_root`, scratch under the system
    /// temp directory.
    #[must_use]
    pub fn new(archive_root: impl Into<PathBuf>) -> Self {
        Self {
            archive_root: archive_root.into(),
            scratch_root: default_scratch_root(),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::Io`] if the file cannot be read; decode
    /// failures surface as `Io` with `InvalidData`, naming the file and the
    /// TOML diagnostic.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            ReconstructError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid config {}: {e}", path.display()),
            ))
        })
    }
}
