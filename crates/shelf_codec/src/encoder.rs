//! Line encoder.

use crate::decoder::FIELD_DELIMITER;
use crate::entry::BookEntry;
use std::fmt::Write;

/// Encode one entry as a record line, without a line terminator.
///
/// A language entry stores its language in the subject slot; a general
/// entry stores its subject verbatim. An entry with no borrower ends in a
/// trailing delimiter.
#[must_use]
pub fn encode_line(entry: &BookEntry) -> String {
    let d = FIELD_DELIMITER;
    format!(
        "{id}{d}{title}{d}{author}{d}{available}{d}{subject}{d}{borrower}",
        id = entry.id(),
        title = entry.title(),
        author = entry.author(),
        available = entry.is_available(),
        subject = entry.effective_subject(),
        borrower = entry.borrowed_by().unwrap_or(""),
    )
}

/// Encode a whole catalog, one record per line, each line terminated by `\n`.
#[must_use]
pub fn encode_document<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a BookEntry>,
{
    let mut out = String::new();
    for entry in entries {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", encode_line(entry));
    }
    out
}
