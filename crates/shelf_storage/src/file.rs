//! File-based storage backend for persistent catalogs.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix appended to the target file name for the staging copy.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based storage backend.
///
/// The document lives in a single UTF-8 text file. Opening a backend does
/// not create the file: the catalog needs to tell a brand-new store apart
/// from an empty one.
///
/// Bytes that are not valid UTF-8 are read as U+FFFD, so one damaged line
/// never hides the rest of the document.
///
/// # Durability
///
/// `replace()` uses the write-then-rename pattern:
/// 1. Write the new document to `<file>.tmp`
/// 2. Sync the temporary file (when `sync` is enabled)
/// 3. Rename it over the target
/// 4. Sync the parent directory so the rename survives a crash (Unix only)
///
/// Once the rename succeeds the new document is in place, so a failure in
/// step 4 is logged rather than returned.
///
/// # Example
///
/// ```no_run
/// use shelf_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("books.txt"));
/// backend.replace("1,Let Us C,Kanetkar,true,C,\n").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    sync: bool,
}

impl FileBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// Nothing is touched on disk until the first `replace`.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            sync: true,
        }
    }

    /// Creates a backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::open(path))
    }

    /// Sets whether `replace` syncs file contents and directory entries.
    #[must_use]
    pub const fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("catalog"));
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> StorageResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> StorageResult<()> {
        // NTFS journals metadata; directories cannot be fsynced on Windows
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    offset = e.utf8_error().valid_up_to(),
                    "document is not valid UTF-8; bad bytes replaced"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(text))
    }

    fn replace(&mut self, contents: &str) -> StorageResult<()> {
        let temp_path = self.temp_path();

        let written = (|| -> StorageResult<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(contents.as_bytes())?;
            if self.sync {
                file.sync_all()?;
            }
            drop(file);
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        if let Err(e) = written {
            // Best effort: a stale staging file must not linger
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if self.sync {
            if let Err(e) = self.sync_parent() {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "document replaced but directory sync failed"
                );
            }
        }

        debug!(path = %self.path.display(), bytes = contents.len(), "replaced document");
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
