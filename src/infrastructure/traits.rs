//! I/O boundary traits for testability
//!
//! These traits abstract filesystem access, allowing the pipeline
//! to be tested with in-memory implementations.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Open a file for reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Replace the file at `path` with `content` in one step.
    ///
    /// Either the whole content is visible at `path` afterwards or the
    /// previous state is left untouched.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation using std::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Temp file lives next to the target so the final rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }

        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }
}
