//! Error types for patent reconstruction.
//!
//! A single enum covers every fatal condition the pipeline can hit, so
//! callers can distinguish "try a different identifier" (`NotFound`) from
//! "data corruption, abort" (`MalformedIndexRecord`, the archive errors).
//! Degraded bibliographic fields are never errors; they surface as empty
//! values in the document model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reconstructing a patent document.
#[derive(Error, Debug)]
pub enum ReconstructError {
    /// The supplied identifier contains no publication digits after
    /// stripping the country prefix and kind code.
    #[error("invalid patent identifier '{0}': not a digits-only publication number")]
    InvalidIdentifier(String),

    /// The index has no record for the canonical key.
    #[error("patent {0} not found in index")]
    NotFound(String),

    /// The index record exists but its locator cannot be parsed.
    #[error("malformed index record for patent {key}: {reason}")]
    MalformedIndexRecord {
        /// Canonical key the record was looked up under
        key: String,
        /// What made the record unusable
        reason: String,
    },

    /// The index itself could not be loaded.
    #[error("failed to load patent index {path}: {reason}")]
    IndexLoad {
        /// Path of the index file
        path: PathBuf,
        /// Underlying load or decode failure
        reason: String,
    },

    /// The year-partitioned outer archive does not exist on disk.
    #[error("outer archive not found: {0}")]
    OuterArchiveNotFound(PathBuf),

    /// No member of the outer archive matches the expected inner archive name.
    #[error("inner archive '{member}' not found in {archive}")]
    InnerArchiveNotFound {
        /// Outer archive that was scanned
        archive: PathBuf,
        /// Expected inner archive member name
        member: String,
    },

    /// The inner archive matched but could not be decoded, or the outer
    /// archive is malformed (e.g. more than one member matches).
    #[error("inner archive '{member}' in {archive} is unusable: {reason}")]
    InnerArchiveCorrupt {
        /// Outer archive the member came from
        archive: PathBuf,
        /// Inner archive member name
        member: String,
        /// Decode or structure failure
        reason: String,
    },

    /// The extraction did not yield exactly one schema file.
    #[error("expected exactly one schema file in {dir}, found {found}")]
    SchemaFileMissing {
        /// Scratch directory that was searched
        dir: PathBuf,
        /// Number of schema-like files found
        found: usize,
    },

    /// The schema file is not well-formed XML.
    #[error("failed to parse schema file {path}: {reason}")]
    SchemaParseError {
        /// Path of the schema file
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// The assembled document could not be serialized.
    #[error("failed to write output document: {0}")]
    DocumentWrite(String),

    /// IO error during extraction or output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ReconstructError>;
