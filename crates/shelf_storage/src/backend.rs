//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-document backing store for the catalog.
///
/// Backends hold a single UTF-8 document. The catalog reads it once when it
/// opens and rewrites it in full after every successful mutation.
///
/// # Invariants
///
/// - `load` returns `None` until the first successful `replace`
///   (or if the underlying store was never created)
/// - after `replace(doc)` succeeds, `load` returns exactly `doc`
/// - a failed `replace` leaves the previous document intact, and a
///   `replace` that has installed the new document reports success
pub trait StorageBackend: Send + Sync {
    /// Reads the whole document.
    ///
    /// Returns `Ok(None)` if the store does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> StorageResult<Option<String>>;

    /// Replaces the whole document with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new document cannot be written. The previous
    /// document is left in place.
    fn replace(&mut self, contents: &str) -> StorageResult<()>;

    /// Returns whether the store exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Returns a short human-readable description of where data lives.
    fn describe(&self) -> String;
}
