//! End-to-end patent document reconstruction.
//!
//! Wires the pipeline stages together: identifier normalization, index
//! lookup, archive extraction, schema parsing, drawing conversion, and PDF
//! assembly. Each stage fully completes before the next begins and stage
//! boundaries are hard — once extraction fails, parsing and assembly never
//! run. The scratch extraction directory lives inside the extraction value
//! and is removed when it drops, whatever the exit path.
//!
//! Two invocation modes exist: identifier mode resolves a publication
//! number through the index ([`Reconstructor::reconstruct_key`]), and
//! direct-file mode starts from an already-extracted schema file
//! ([`reconstruct_schema_file`]), bypassing the locator and extractor
//! entirely.

use log::info;
use priorart_archive::{
    extract_filing, list_filing, locate, ArchiveLocation, FileInfo, SCHEMA_EXTENSION,
};
use priorart_core::{DocumentModel, PatentIndex, PatentKey, ReconstructorConfig, Result};
use priorart_render::{assemble_document, convert_drawings};
use priorart_xml::parse_schema_file;
use std::path::{Path, PathBuf};

/// Identifier-mode pipeline over an injected index and configuration.
pub struct Reconstructor<'a> {
    config: ReconstructorConfig,
    index: &'a dyn PatentIndex,
}

impl<'a> Reconstructor<'a> {
    /// Build a pipeline over the given configuration and index.
    #[must_use]
    pub fn new(config: ReconstructorConfig, index: &'a dyn PatentIndex) -> Self {
        Self { config, index }
    }

    /// Reconstruct one patent end to end and return the PDF bytes.
    ///
    /// # Errors
    ///
    /// Any fatal pipeline error: lookup, archive, parse, or serialization.
    pub fn reconstruct_key(&self, key: &PatentKey) -> Result<Vec<u8>> {
        let location = self.locate_key(key)?;
        info!(
            "extracting {} from {}",
            location.inner_member,
            location.outer_archive.display()
        );

        let extraction = extract_filing(&location, &self.config)?;
        info!(
            "extracted {} files, schema {}",
            extraction.file_names.len(),
            extraction.schema_file.display()
        );

        reconstruct_schema_file(&extraction.schema_file)
        // extraction drops here; the scratch directory is removed even
        // when parsing or assembly failed above
    }

    /// Resolve a patent's archive location without touching the archive.
    ///
    /// # Errors
    ///
    /// Lookup errors only: `NotFound` or `MalformedIndexRecord`.
    pub fn locate_key(&self, key: &PatentKey) -> Result<ArchiveLocation> {
        locate(self.index, &self.config, key)
    }

    /// Parse a patent's filing into the document model without assembling
    /// a PDF. The scratch extraction is discarded before returning.
    ///
    /// # Errors
    ///
    /// Lookup, archive, or parse errors.
    pub fn parse_key(&self, key: &PatentKey) -> Result<DocumentModel> {
        let location = self.locate_key(key)?;
        let extraction = extract_filing(&location, &self.config)?;
        parse_schema_file(&extraction.schema_file)
    }

    /// List the members of a patent's inner archive.
    ///
    /// # Errors
    ///
    /// Lookup or archive errors.
    pub fn list_key(&self, key: &PatentKey) -> Result<(ArchiveLocation, Vec<FileInfo>)> {
        let location = self.locate_key(key)?;
        let files = list_filing(&location)?;
        Ok((location, files))
    }
}

/// Direct-file mode: parse an already-extracted schema file, convert its
/// drawings, and assemble the PDF.
///
/// # Errors
///
/// Parse or serialization errors; per-drawing conversion failures are
/// logged and skipped, never fatal.
pub fn reconstruct_schema_file(schema_file: &Path) -> Result<Vec<u8>> {
    let model = parse_schema_file(schema_file)?;
    let images = convert_drawings(&model.drawings);
    assemble_document(&model, images)
}

/// Whether the input selects direct-file mode: an existing file whose
/// extension is the schema extension.
#[must_use]
pub fn is_schema_path(input: &str) -> bool {
    let path = Path::new(input);
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCHEMA_EXTENSION))
}

/// Default output path in identifier mode: `US<key>_reconstructed.pdf`.
#[must_use]
pub fn default_output_for_key(key: &PatentKey) -> PathBuf {
    PathBuf::from(format!("US{key}_reconstructed.pdf"))
}

/// Default output path in direct-file mode, derived from the schema file's
/// base name.
#[must_use]
pub fn default_output_for_schema(schema_file: &Path) -> PathBuf {
    let stem = schema_file
        .file_stem()
        .map_or_else(|| "patent".to_string(), |s| s.to_string_lossy().into_owned());
    PathBuf::from(format!("{stem}_reconstructed.pdf"))
}
