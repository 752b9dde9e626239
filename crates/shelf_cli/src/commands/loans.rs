//! Loan commands: borrow and return.

use super::CommandResult;
use shelf_codec::BookId;
use shelf_core::Catalog;
use std::io::Write;

/// Runs the borrow command.
pub fn borrow<W: Write>(
    catalog: &mut Catalog,
    admission: &str,
    id: BookId,
    field: &str,
    out: &mut W,
) -> CommandResult {
    let lent = catalog.borrow(admission, id, field)?;
    writeln!(out, "Book borrowed successfully: {}", lent.title())?;
    Ok(())
}

/// Runs the return command.
pub fn return_book<W: Write>(catalog: &mut Catalog, admission: &str, out: &mut W) -> CommandResult {
    let returned = catalog.return_book(admission)?;
    writeln!(out, "You have successfully returned: {}", returned.title())?;
    Ok(())
}
