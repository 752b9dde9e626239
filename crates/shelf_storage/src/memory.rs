//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::io;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    document: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// An in-memory storage backend.
///
/// This backend keeps the document in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral catalogs that don't need persistence
///
/// Clones share the same underlying document, so a test can hand one clone
/// to a catalog and inspect what was written through another.
///
/// # Example
///
/// ```rust
/// use shelf_storage::{StorageBackend, InMemoryBackend};
///
/// let observer = InMemoryBackend::new();
/// let mut backend = observer.clone();
/// backend.replace("test data").unwrap();
/// assert_eq!(observer.document().as_deref(), Some("test data"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryBackend {
    /// Creates a backend whose store does not exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with a pre-existing document.
    ///
    /// Useful for testing load behaviour.
    #[must_use]
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                document: Some(document.into()),
                ..MemoryState::default()
            })),
        }
    }

    /// Returns a copy of the current document.
    #[must_use]
    pub fn document(&self) -> Option<String> {
        self.state.read().document.clone()
    }

    /// Returns how many successful `replace` calls have been made.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.read().writes
    }

    /// Makes every subsequent `replace` fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.state.write().fail_writes = fail;
    }
}

impl StorageBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.state.read().document.clone())
    }

    fn replace(&mut self, contents: &str) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.fail_writes {
            return Err(io::Error::other("simulated write failure").into());
        }
        state.document = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.state.read().document.is_some())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
