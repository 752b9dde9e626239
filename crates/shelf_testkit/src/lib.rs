//! # Shelf Testkit
//!
//! Test utilities for the shelf catalog.
//!
//! This crate provides:
//! - Test fixtures wrapping in-memory and temp-file catalogs
//! - Property-based test generators using proptest
//! - A reference model for checking catalog behaviour operation by operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_catalog() {
//!     with_seeded_catalog(|catalog| {
//!         assert_eq!(catalog.search_by_title("let").count(), 1);
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
