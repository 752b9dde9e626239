//! CLI command implementations.

pub mod books;
pub mod loans;
pub mod menu;
pub mod verify;

use clap::ValueEnum;
use shelf_core::{Catalog, CatalogConfig, CatalogResult};
use std::path::Path;

/// Result type for scripted commands.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// How listings are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per book.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Opens the catalog file at `path`.
pub fn open_catalog(path: &Path, no_seed: bool) -> CatalogResult<Catalog> {
    let config = CatalogConfig::new().seed_if_missing(!no_seed);
    let catalog = Catalog::open_with_config(path, config)?;

    let summary = catalog.load_summary();
    if summary.skipped > 0 {
        eprintln!(
            "Warning: skipped {} unreadable line(s) in {}",
            summary.skipped,
            path.display()
        );
    }
    Ok(catalog)
}
