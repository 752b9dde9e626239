//! Line decoder.

use crate::entry::{BookEntry, BookId, Subject};
use crate::error::{CodecError, CodecResult};

/// Separator between the fields of a record.
pub const FIELD_DELIMITER: char = ',';

/// Number of fields in a record: id, title, author, available, subject, borrower.
pub const FIELD_COUNT: usize = 6;

/// Decode one record line.
///
/// Fields beyond the sixth are ignored. Empty trailing fields are kept, so a
/// line ending in a comma decodes to an entry without a borrower.
///
/// # Errors
///
/// - [`CodecError::MalformedRecord`] if the line has fewer than six fields
/// - [`CodecError::InvalidId`] if the id is not a positive integer
pub fn decode_line(line: &str) -> CodecResult<BookEntry> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < FIELD_COUNT {
        return Err(CodecError::malformed(FIELD_COUNT, fields.len()));
    }

    let id = parse_id(fields[0])?;
    let available = parse_available(fields[3]);
    let subject = Subject::from_field(fields[4]);
    let borrowed_by = Some(fields[5])
        .filter(|b| !b.is_empty())
        .map(str::to_string);

    Ok(BookEntry::from_parts(
        id,
        fields[1],
        fields[2],
        available,
        subject,
        borrowed_by,
    ))
}

fn parse_id(field: &str) -> CodecResult<BookId> {
    match field.parse::<BookId>() {
        Ok(0) | Err(_) => Err(CodecError::invalid_id(field)),
        Ok(id) => Ok(id),
    }
}

/// Anything other than "true" (in any case) reads as not available.
fn parse_available(field: &str) -> bool {
    field.eq_ignore_ascii_case("true")
}

/// A line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the document.
    pub line_number: usize,
    /// Why the line was rejected.
    pub error: CodecError,
}

/// The outcome of decoding a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Entries decoded successfully, in document order.
    pub entries: Vec<BookEntry>,
    /// Lines that were rejected.
    pub skipped: Vec<SkippedLine>,
}

/// Decode every line of a stored document.
///
/// A bad line never aborts the decode: it is recorded in
/// [`DecodeReport::skipped`] and decoding carries on. Blank lines are
/// ignored without being reported.
#[must_use]
pub fn decode_document(text: &str) -> DecodeReport {
    let mut report = DecodeReport::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line) {
            Ok(entry) => report.entries.push(entry),
            Err(error) => report.skipped.push(SkippedLine {
                line_number: index + 1,
                error,
            }),
        }
    }

    report
}
