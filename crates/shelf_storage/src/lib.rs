//! # Shelf Storage
//!
//! Backing store trait and implementations for the shelf catalog.
//!
//! A backing store holds exactly one text document: the serialized catalog.
//! Stores are **opaque**. They do not know about records, delimiters or
//! books; the catalog owns all format interpretation.
//!
//! ## Design Principles
//!
//! - A store is read whole and replaced whole, never patched
//! - A missing store is distinguishable from an empty one
//! - Replacement is atomic: readers see the old document or the new one
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral catalogs
//! - [`FileBackend`] - For persistent storage in a UTF-8 text file
//!
//! ## Example
//!
//! ```rust
//! use shelf_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.load().unwrap().is_none());
//!
//! backend.replace("1,Let Us C,Kanetkar,true,C,\n").unwrap();
//! assert_eq!(backend.load().unwrap().as_deref(), Some("1,Let Us C,Kanetkar,true,C,\n"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
