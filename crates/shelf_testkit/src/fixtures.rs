//! Test fixtures and catalog helpers.
//!
//! Provides convenience functions for setting up test catalogs
//! and common test scenarios.

use shelf_core::{Catalog, CatalogConfig};
use shelf_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A well-formed admission number.
pub const STUDENT_A: &str = "GU202300123";

/// A second well-formed admission number.
pub const STUDENT_B: &str = "GU202300999";

/// A test catalog with automatic cleanup.
pub struct TestCatalog {
    /// The catalog instance.
    pub catalog: Catalog,
    backend: Option<InMemoryBackend>,
    path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestCatalog {
    /// Creates an in-memory catalog holding the seed books.
    pub fn memory() -> Self {
        Self::over(InMemoryBackend::new(), CatalogConfig::default())
    }

    /// Creates an in-memory catalog with no books.
    pub fn empty() -> Self {
        Self::over(
            InMemoryBackend::new(),
            CatalogConfig::new().seed_if_missing(false),
        )
    }

    /// Creates an in-memory catalog loaded from `document`.
    pub fn with_document(document: &str) -> Self {
        Self::over(InMemoryBackend::with_document(document), CatalogConfig::default())
    }

    /// Creates a file-based catalog in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("books.txt");
        let catalog = Catalog::open_with_config(&path, CatalogConfig::new().sync_on_save(false))
            .expect("Failed to open file catalog");

        Self {
            catalog,
            backend: None,
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    fn over(backend: InMemoryBackend, config: CatalogConfig) -> Self {
        let catalog = Catalog::open_with_backend(config, Box::new(backend.clone()))
            .expect("Failed to open in-memory catalog");
        Self {
            catalog,
            backend: Some(backend),
            path: None,
            _temp_dir: None,
        }
    }

    /// Returns the catalog file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the in-memory backend handle, if any.
    pub fn backend(&self) -> Option<&InMemoryBackend> {
        self.backend.as_ref()
    }

    /// Returns what is currently in the backing store.
    pub fn stored_document(&self) -> Option<String> {
        match (&self.backend, &self.path) {
            (Some(backend), _) => backend.document(),
            (None, Some(path)) => std::fs::read_to_string(path).ok(),
            (None, None) => None,
        }
    }

    /// Closes the catalog and opens it again from the same store.
    pub fn reopen(self) -> Self {
        let Self {
            catalog,
            backend,
            path,
            _temp_dir,
        } = self;
        let config = catalog.config().clone();
        catalog.close().expect("Failed to close catalog");

        let catalog = match (&backend, &path) {
            (Some(backend), _) => Catalog::open_with_backend(config, Box::new(backend.clone())),
            (None, Some(path)) => Catalog::open_with_config(path, config),
            (None, None) => unreachable!("a test catalog always has a store"),
        }
        .expect("Failed to reopen catalog");

        Self {
            catalog,
            backend,
            path,
            _temp_dir,
        }
    }
}

impl std::ops::Deref for TestCatalog {
    type Target = Catalog;

    fn deref(&self) -> &Self::Target {
        &self.catalog
    }
}

impl std::ops::DerefMut for TestCatalog {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.catalog
    }
}

/// Runs a test with a temporary in-memory catalog holding the seed books.
///
/// # Example
///
/// ```rust,ignore
/// use shelf_testkit::with_seeded_catalog;
///
/// #[test]
/// fn my_test() {
///     with_seeded_catalog(|catalog| {
///         catalog.borrow("GU202300123", 9, "Law").unwrap();
///     });
/// }
/// ```
pub fn with_seeded_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&mut Catalog) -> R,
{
    let mut test_catalog = TestCatalog::memory();
    f(&mut test_catalog.catalog)
}

/// Runs a test with a temporary file-based catalog.
pub fn with_file_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&mut Catalog, &Path) -> R,
{
    let mut test_catalog = TestCatalog::file();
    let path = test_catalog
        .path
        .clone()
        .expect("File catalog should have a path");
    f(&mut test_catalog.catalog, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_catalog_is_seeded() {
        let test_catalog = TestCatalog::memory();
        assert_eq!(test_catalog.len(), 10);
        assert!(test_catalog.stored_document().is_some());
    }

    #[test]
    fn empty_catalog_has_no_store() {
        let test_catalog = TestCatalog::empty();
        assert!(test_catalog.is_empty());
        assert!(test_catalog.stored_document().is_none());
    }

    #[test]
    fn file_catalog_reopens() {
        let mut test_catalog = TestCatalog::file();
        test_catalog.borrow(STUDENT_A, 9, "Law").unwrap();

        let test_catalog = test_catalog.reopen();
        assert_eq!(test_catalog.loan_of(STUDENT_A), Some(9));
        assert!(test_catalog.path().unwrap().exists());
    }

    #[test]
    fn with_seeded_catalog_runs() {
        let count = with_seeded_catalog(|catalog| catalog.search_by_title("of").count());
        assert_eq!(count, 3);
    }

    #[test]
    fn with_file_catalog_runs() {
        with_file_catalog(|catalog, path| {
            assert_eq!(catalog.len(), 10);
            assert!(path.exists());
        });
    }
}
