//! Scoped scratch directories.

use priorart_core::Result;
use std::path::Path;
use tempfile::TempDir;

/// A scratch extraction directory removed on every exit path.
///
/// Created immediately before extraction; the directory and everything in
/// it is deleted when the guard drops, whether the invocation succeeded,
/// failed at a later stage, or unwound. Concurrent invocations are safe
/// because each gets its own uniquely named directory.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a fresh scratch directory under `root`, creating `root`
    /// itself if needed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the root cannot be created or is not
    /// writable.
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("patent-reconstruct-")
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
