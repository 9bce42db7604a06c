//! Extraction of one patent's filing from the bulk archive tree.
//!
//! Outer archives are year-partitioned TARs bundling many filings; each
//! filing is a ZIP member holding one schema file plus its drawing files.
//! The outer archive is scanned in full so that a duplicate member is
//! detected instead of silently picking the first match, and the inner
//! archive is buffered whole — a single filing is small enough that
//! streaming it would buy nothing.

use crate::locate::ArchiveLocation;
use crate::scratch::ScratchDir;
use flate2::read::GzDecoder;
use log::debug;
use priorart_core::{ReconstructError, ReconstructorConfig, Result};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Extension identifying the domain-schema file inside a filing.
pub const SCHEMA_EXTENSION: &str = "XML";

/// One filing materialized into a scratch directory.
///
/// The scratch directory lives exactly as long as this value; dropping it
/// removes every extracted file.
#[derive(Debug)]
pub struct Extraction {
    scratch: ScratchDir,
    /// Path of the single schema file inside the scratch directory.
    pub schema_file: PathBuf,
    /// Basenames of every extracted file, in archive order.
    pub file_names: Vec<String>,
}

impl Extraction {
    /// The scratch directory holding the extracted files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.scratch.path()
    }
}

/// Name and size of one inner archive member, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileInfo {
    /// Member name as stored in the inner archive.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Extract a filing into a fresh scratch directory.
///
/// Internal directory structure of the inner archive is flattened: every
/// file member lands in the scratch directory under its basename.
///
/// # Errors
///
/// - [`ReconstructError::OuterArchiveNotFound`] — outer path does not exist
/// - [`ReconstructError::InnerArchiveNotFound`] — no member matches after a
///   full scan
/// - [`ReconstructError::InnerArchiveCorrupt`] — more than one member
///   matches, or the inner archive fails to decode
/// - [`ReconstructError::SchemaFileMissing`] — extraction did not yield
///   exactly one `.XML` file
pub fn extract_filing(
    location: &ArchiveLocation,
    config: &ReconstructorConfig,
) -> Result<Extraction> {
    if !location.outer_archive.exists() {
        return Err(ReconstructError::OuterArchiveNotFound(
            location.outer_archive.clone(),
        ));
    }

    let inner_bytes = read_inner_archive(location)?;
    debug!(
        "buffered inner archive {} ({} bytes)",
        location.inner_member,
        inner_bytes.len()
    );

    let scratch = ScratchDir::create(&config.scratch_root)?;
    let file_names = unpack_inner(&inner_bytes, scratch.path(), location)?;
    let schema_file = find_schema_file(scratch.path())?;

    Ok(Extraction {
        scratch,
        schema_file,
        file_names,
    })
}

/// List the inner archive's file members without extracting anything.
///
/// # Errors
///
/// Same archive errors as [`extract_filing`]; no scratch directory is
/// created.
pub fn list_filing(location: &ArchiveLocation) -> Result<Vec<FileInfo>> {
    if !location.outer_archive.exists() {
        return Err(ReconstructError::OuterArchiveNotFound(
            location.outer_archive.clone(),
        ));
    }

    let inner_bytes = read_inner_archive(location)?;
    let mut archive =
        ZipArchive::new(Cursor::new(inner_bytes)).map_err(|e| corrupt(location, e.to_string()))?;

    let mut files = Vec::new();
    for i in 0..archive.len() {
        let member = archive
            .by_index(i)
            .map_err(|e| corrupt(location, e.to_string()))?;
        if member.is_dir() {
            continue;
        }
        files.push(FileInfo {
            name: member.name().to_string(),
            size: member.size(),
        });
    }
    Ok(files)
}

fn corrupt(location: &ArchiveLocation, reason: String) -> ReconstructError {
    ReconstructError::InnerArchiveCorrupt {
        archive: location.outer_archive.clone(),
        member: location.inner_member.clone(),
        reason,
    }
}

/// Open the outer archive for streaming, decompressing by extension.
fn open_outer(path: &Path) -> Result<Archive<Box<dyn Read>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    let reader: Box<dyn Read> = match extension.as_str() {
        "gz" | "tgz" => Box::new(GzDecoder::new(reader)),
        _ => Box::new(reader),
    };
    Ok(Archive::new(reader))
}

/// Scan the outer archive for the member whose basename equals the expected
/// inner archive name and buffer its bytes.
///
/// The scan always runs to the end of the archive: relying on first-match
/// would silently produce the wrong document from a malformed archive, so a
/// second match is an error.
fn read_inner_archive(location: &ArchiveLocation) -> Result<Vec<u8>> {
    let expected = OsStr::new(location.inner_member.as_str());
    let mut archive = open_outer(&location.outer_archive)?;

    let mut matched: Option<Vec<u8>> = None;
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        // The outer archive may nest the member inside an arbitrary
        // subdirectory path; match on the basename only.
        let is_match = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == expected);
        if !is_match {
            continue;
        }

        if matched.is_some() {
            return Err(corrupt(
                location,
                "more than one member matches; outer archive is ambiguous".to_string(),
            ));
        }

        let size = entry.header().size()?;
        let mut contents = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        entry.read_to_end(&mut contents)?;
        matched = Some(contents);
    }

    matched.ok_or_else(|| ReconstructError::InnerArchiveNotFound {
        archive: location.outer_archive.clone(),
        member: location.inner_member.clone(),
    })
}

/// Unpack every file member of the inner archive into `dest`, flattened to
/// basenames. Directory-only entries are skipped.
fn unpack_inner(bytes: &[u8], dest: &Path, location: &ArchiveLocation) -> Result<Vec<String>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupt(location, e.to_string()))?;

    let mut names = Vec::new();
    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .map_err(|e| corrupt(location, e.to_string()))?;
        if member.is_dir() {
            continue;
        }

        let Some(basename) = Path::new(member.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        if basename.starts_with("._") {
            // macOS resource fork companions occasionally leak into bulk
            // distributions; they are never part of the filing.
            continue;
        }

        let target = dest.join(&basename);
        let mut out = File::create(&target)?;
        std::io::copy(&mut member, &mut out).map_err(|e| corrupt(location, e.to_string()))?;
        debug!("extracted {basename}");
        names.push(basename);
    }

    Ok(names)
}

/// Identify the single schema file among the extracted files.
fn find_schema_file(dir: &Path) -> Result<PathBuf> {
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCHEMA_EXTENSION))
        {
            matches.push(path);
        }
    }

    if matches.len() == 1 {
        Ok(matches.pop().expect("length checked"))
    } else {
        Err(ReconstructError::SchemaFileMissing {
            dir: dir.to_path_buf(),
            found: matches.len(),
        })
    }
}
