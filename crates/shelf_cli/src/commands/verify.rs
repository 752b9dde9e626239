//! Verify command implementation.

use super::{CommandResult, OutputFormat};
use serde::Serialize;
use shelf_core::Catalog;
use std::io::Write;

/// Verification result.
#[derive(Debug, Serialize)]
pub struct VerifyResult {
    /// Where the catalog is stored.
    pub store: String,
    /// Number of books loaded.
    pub books: usize,
    /// Number of active loans.
    pub loans: usize,
    /// Lines that could not be read.
    pub skipped_lines: usize,
    /// Inconsistencies between books and loans.
    pub problems: Vec<String>,
}

impl VerifyResult {
    fn collect(catalog: &Catalog) -> Self {
        Self {
            store: catalog.location(),
            books: catalog.len(),
            loans: catalog.loans().count(),
            skipped_lines: catalog.load_summary().skipped,
            problems: catalog.verify().iter().map(ToString::to_string).collect(),
        }
    }

    fn is_ok(&self) -> bool {
        self.skipped_lines == 0 && self.problems.is_empty()
    }
}

/// Runs the verify command.
pub fn run<W: Write>(catalog: &Catalog, format: OutputFormat, out: &mut W) -> CommandResult {
    let result = VerifyResult::collect(catalog);

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        OutputFormat::Text => print_result(&result, out)?,
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err("Verification failed".into())
    }
}

fn print_result<W: Write>(result: &VerifyResult, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Verifying catalog at {}", result.store)?;
    writeln!(out)?;
    writeln!(out, "  Books:         {}", result.books)?;
    writeln!(out, "  Loans:         {}", result.loans)?;
    writeln!(out, "  Skipped lines: {}", result.skipped_lines)?;

    if !result.problems.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Problems:")?;
        for problem in &result.problems {
            writeln!(out, "    - {problem}")?;
        }
    }

    writeln!(out)?;
    if result.is_ok() {
        writeln!(out, "✓ Catalog verification passed")
    } else {
        writeln!(out, "✗ Catalog verification failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::CatalogConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_catalog_passes() {
        let catalog = Catalog::open_in_memory().unwrap();
        let mut out = Vec::new();

        run(&catalog, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Books:         10"));
        assert!(text.contains("passed"));
    }

    #[test]
    fn damaged_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.txt");
        fs::write(
            &path,
            "1,Let Us C,Kanetkar,true,C,GU202300123\n2,Broken\n",
        )
        .unwrap();

        let catalog =
            Catalog::open_with_config(&path, CatalogConfig::new().sync_on_save(false)).unwrap();
        let mut out = Vec::new();

        assert!(run(&catalog, OutputFormat::Json, &mut out).is_err());
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["books"], 1);
        assert_eq!(value["skipped_lines"], 1);
        assert_eq!(value["problems"].as_array().unwrap().len(), 1);
    }
}
