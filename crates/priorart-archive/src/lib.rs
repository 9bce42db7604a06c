//! Archive location and extraction for patent filings.
//!
//! Bulk patent distributions nest two container levels: a year-partitioned
//! outer TAR archive bundling a week of filings, and a per-patent inner ZIP
//! archive holding one schema file plus its drawing files. This crate
//! resolves an index record to a location inside that tree ([`locate`]) and
//! materializes one filing into a scoped scratch directory
//! ([`extract_filing`]).
//!
//! ```no_run
//! use priorart_archive::{extract_filing, locate};
//! use priorart_core::{JsonFileIndex, PatentKey, ReconstructorConfig};
//! use std::path::Path;
//!
//! let config = ReconstructorConfig::new("/mnt/patents/data/historical");
//! let index = JsonFileIndex::load(Path::new("index.json"))?;
//! let key = PatentKey::normalize("US20160148332A1")?;
//!
//! let location = locate(&index, &config, &key)?;
//! let extraction = extract_filing(&location, &config)?;
//! println!("schema file: {}", extraction.schema_file.display());
//! // extraction's scratch directory is removed when it goes out of scope
//! # Ok::<(), priorart_core::ReconstructError>(())
//! ```

pub mod extract;
pub mod locate;
pub mod scratch;

pub use extract::{extract_filing, list_filing, Extraction, FileInfo, SCHEMA_EXTENSION};
pub use locate::{locate, ArchiveLocation, INNER_ARCHIVE_EXTENSION};
pub use scratch::ScratchDir;
