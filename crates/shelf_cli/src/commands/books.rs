//! Book commands: list, add, delete, search.

use super::{CommandResult, OutputFormat};
use shelf_codec::{BookEntry, BookId};
use shelf_core::{Catalog, NewBook};
use std::io::Write;

/// Prints `entries` in the requested format.
pub fn print_entries<'a, I, W>(entries: I, format: OutputFormat, out: &mut W) -> CommandResult
where
    I: IntoIterator<Item = &'a BookEntry>,
    W: Write,
{
    let entries: Vec<&BookEntry> = entries.into_iter().collect();
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
        OutputFormat::Text => {
            for entry in entries {
                writeln!(out, "{entry}")?;
            }
        }
    }
    Ok(())
}

/// Runs the list command.
pub fn list<W: Write>(catalog: &Catalog, format: OutputFormat, out: &mut W) -> CommandResult {
    if catalog.is_empty() && format == OutputFormat::Text {
        writeln!(out, "No books available.")?;
        return Ok(());
    }
    print_entries(catalog.entries(), format, out)
}

/// Runs the add command.
pub fn add<W: Write>(catalog: &mut Catalog, book: NewBook, out: &mut W) -> CommandResult {
    let added = catalog.add(book)?;
    writeln!(out, "Added: {added}")?;
    Ok(())
}

/// Runs the delete command.
pub fn delete<W: Write>(catalog: &mut Catalog, id: BookId, out: &mut W) -> CommandResult {
    let removed = catalog.delete(id)?;
    writeln!(out, "Deleted: {}", removed.title())?;
    Ok(())
}

/// Runs the search command.
pub fn search<W: Write>(
    catalog: &Catalog,
    keyword: &str,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult {
    let hits: Vec<&BookEntry> = catalog.search_by_title(keyword).collect();
    if hits.is_empty() && format == OutputFormat::Text {
        writeln!(out, "No books found with the title containing: {keyword}")?;
        return Ok(());
    }
    print_entries(hits, format, out)
}
