//! Archive location resolution.
//!
//! Turns an index record into the concrete path of the outer archive and
//! the name of the inner archive member expected to hold the patent's
//! files. This is pure path/string computation: existence is verified by
//! the extractor, so a locator failure always means bad index data, never a
//! filesystem problem.

use priorart_core::{
    IndexRecord, PatentIndex, PatentKey, ReconstructError, ReconstructorConfig, Result,
};
use std::path::PathBuf;

/// Extension of the per-patent inner archive as it appears in bulk
/// distributions.
pub const INNER_ARCHIVE_EXTENSION: &str = "ZIP";

/// Resolved location of one patent's filing inside the archive tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocation {
    /// Year partition the outer archive lives under.
    pub year: String,
    /// Full path of the outer archive.
    pub outer_archive: PathBuf,
    /// Inner archive member name, e.g. `US20160148332A1-20160526.ZIP`.
    pub inner_member: String,
}

impl ArchiveLocation {
    /// Derive a location from an index record.
    ///
    /// The record's `raw_locator` must carry at least two `/`-separated
    /// non-empty segments: the outer archive filename and the inner member
    /// name without extension. Extra segments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::MalformedIndexRecord`] when the locator
    /// does not have that shape.
    pub fn from_record(
        config: &ReconstructorConfig,
        key: &PatentKey,
        record: &IndexRecord,
    ) -> Result<Self> {
        let malformed = |reason: &str| ReconstructError::MalformedIndexRecord {
            key: key.to_string(),
            reason: format!("{reason} (raw_locator: '{}')", record.raw_locator),
        };

        let mut segments = record.raw_locator.split('/');
        let outer_name = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing outer archive segment"))?;
        let member_stem = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing inner archive segment"))?;

        Ok(Self {
            year: record.year.clone(),
            outer_archive: config.archive_root.join(&record.year).join(outer_name),
            inner_member: format!("{member_stem}.{INNER_ARCHIVE_EXTENSION}"),
        })
    }
}

/// Look a patent up in the index and resolve its archive location.
///
/// # Errors
///
/// Returns [`ReconstructError::NotFound`] when the index has no record for
/// the key, [`ReconstructError::MalformedIndexRecord`] when the record's
/// locator is structurally invalid, or whatever the index itself raises.
pub fn locate(
    index: &dyn PatentIndex,
    config: &ReconstructorConfig,
    key: &PatentKey,
) -> Result<ArchiveLocation> {
    let record = index
        .lookup(key)?
        .ok_or_else(|| ReconstructError::NotFound(key.to_string()))?;
    ArchiveLocation::from_record(config, key, &record)
}
