//! Patent index lookup.
//!
//! The index maps a canonical publication number to the raw locator of its
//! filing inside the bulk archive tree. The lookup service itself is a
//! collaborator behind the [`PatentIndex`] trait; this crate ships a
//! read-only JSON-file implementation, which is all the pipeline needs and
//! keeps database plumbing out of the core.

use crate::error::{ReconstructError, Result};
use crate::ident::PatentKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One record from the patent index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Encodes `outer-archive-filename/inner-archive-membername-without-extension`,
    /// e.g. `I20160526.tar/US20160148332A1-20160526`. Trailing segments
    /// (an explicit file path inside the member) are tolerated and ignored.
    pub raw_locator: String,
    /// Year partition of the outer archive, e.g. `2016`.
    pub year: String,
    /// Invention title as indexed.
    #[serde(default)]
    pub title: String,
}

/// Read-only lookup from canonical key to index record.
pub trait PatentIndex {
    /// Look up one patent.
    ///
    /// `Ok(None)` means the index has no record for the key; callers turn
    /// that into [`ReconstructError::NotFound`]. Errors are reserved for the
    /// index itself being unusable.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the shipped file index only fails at load
    /// time, so its `lookup` never errors.
    fn lookup(&self, key: &PatentKey) -> Result<Option<IndexRecord>>;
}

/// Index backed by a JSON file mapping canonical keys to records:
///
/// ```json
/// {
///   "20160148332": {
///     "raw_locator": "I20160526.tar/US20160148332A1-20160526",
///     "year": "2016",
///     "title": "DRIVE UNIT"
///   }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileIndex {
    path: PathBuf,
    records: HashMap<String, IndexRecord>,
}

impl JsonFileIndex {
    /// Load the whole index into memory.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::IndexLoad`] if the file cannot be read
    /// or is not a JSON object of records.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ReconstructError::IndexLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let records: HashMap<String, IndexRecord> =
            serde_json::from_str(&raw).map_err(|e| ReconstructError::IndexLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Path the index was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of indexed patents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index contains no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PatentIndex for JsonFileIndex {
    fn lookup(&self, key: &PatentKey) -> Result<Option<IndexRecord>> {
        Ok(self.records.get(key.as_str()).cloned())
    }
}
