//! # Shelf Core
//!
//! Catalog store for the shelf library catalog.
//!
//! This crate provides:
//! - The [`Catalog`]: add, delete, find, search, borrow and return books
//! - The borrower index enforcing one loan per student
//! - Admission number validation (`GUYYYYNNNNN`)
//! - Seed books for a brand-new catalog
//! - Consistency checks for damaged stores
//!
//! Persistence goes through `shelf_storage`; records are encoded with
//! `shelf_codec`. The whole catalog is rewritten after every successful
//! mutation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod admission;
mod catalog;
mod config;
mod error;
mod index;
mod seed;
mod verify;

pub use admission::{AdmissionNumber, ADMISSION_EXAMPLE, ADMISSION_FORMAT};
pub use catalog::{Catalog, LoadSummary, NewBook};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use index::BorrowerIndex;
pub use seed::seed_entries;
pub use verify::Inconsistency;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
