//! Core types for patent document reconstruction.
//!
//! This crate holds everything the pipeline stages share: the error enum,
//! the pipeline configuration, identifier normalization, the index lookup
//! seam, and the typed document model the parser produces and the assembler
//! consumes. It performs no archive, XML, or PDF work itself.

pub mod config;
pub mod date;
pub mod error;
pub mod ident;
pub mod index;
pub mod model;

pub use config::ReconstructorConfig;
pub use date::format_archive_date;
pub use error::{ReconstructError, Result};
pub use ident::PatentKey;
pub use index::{IndexRecord, JsonFileIndex, PatentIndex};
pub use model::{Claim, DocumentModel, Drawing, Inventor, Metadata, Paragraph, Provisional};
