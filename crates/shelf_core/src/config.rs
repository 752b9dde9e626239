//! Catalog configuration.

/// Configuration for opening a catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Whether to populate a brand-new store with the seed books.
    pub seed_if_missing: bool,

    /// Whether each save syncs the file and its directory entry to disk.
    pub sync_on_save: bool,

    /// Whether to create missing parent directories of the catalog file.
    pub create_dirs: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_if_missing: true,
            sync_on_save: true,
            create_dirs: true,
        }
    }
}

impl CatalogConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to seed a brand-new store.
    #[must_use]
    pub const fn seed_if_missing(mut self, value: bool) -> Self {
        self.seed_if_missing = value;
        self
    }

    /// Sets whether saves sync to disk.
    #[must_use]
    pub const fn sync_on_save(mut self, value: bool) -> Self {
        self.sync_on_save = value;
        self
    }

    /// Sets whether missing parent directories are created.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }
}
