//! Error types for catalog operations.

use crate::admission::{ADMISSION_EXAMPLE, ADMISSION_FORMAT};
use shelf_codec::BookId;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur in catalog operations.
///
/// None of these are fatal: a failed operation leaves the catalog exactly as
/// it was before the call, and the caller may go on with the next one.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading or writing the backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] shelf_storage::StorageError),

    /// A book with this id already exists.
    #[error("book id {id} already exists; choose a different id")]
    DuplicateId {
        /// The id that is already taken.
        id: BookId,
    },

    /// No book has this id.
    #[error("no book found with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: BookId,
    },

    /// The book is on loan and cannot be deleted.
    #[error("cannot delete book {id}: it is currently borrowed")]
    StillBorrowed {
        /// The book that is on loan.
        id: BookId,
    },

    /// The admission number does not have the required shape.
    #[error(
        "invalid admission number {value:?}: expected {}, for example {}",
        ADMISSION_FORMAT,
        ADMISSION_EXAMPLE
    )]
    InvalidAdmissionFormat {
        /// The rejected text.
        value: String,
    },

    /// The student already holds a book.
    #[error("{admission} has already borrowed book {book_id}; return it before borrowing another")]
    AlreadyBorrowing {
        /// The student's admission number.
        admission: String,
        /// The book currently on loan to the student.
        book_id: BookId,
    },

    /// The book is already on loan to someone.
    #[error("book {id} is currently borrowed by someone else")]
    NotAvailable {
        /// The book that is on loan.
        id: BookId,
    },

    /// The student's field of study does not match the book's subject.
    #[error("field of study {field:?} does not match book {id} ({subject}); you can only borrow books from your field of study")]
    FieldMismatch {
        /// The requested book.
        id: BookId,
        /// The subject the field must match (the language for programming books).
        subject: String,
        /// The field of study that was given.
        field: String,
    },

    /// The student has nothing to return.
    #[error("{admission} has not borrowed any book")]
    NoActiveLoan {
        /// The student's admission number.
        admission: String,
    },

    /// The loan record pointed at a book that no longer exists.
    #[error("loan record for {admission} pointed to missing book {book_id}; the stale record was removed")]
    InconsistentState {
        /// The student's admission number.
        admission: String,
        /// The book id the stale record named.
        book_id: BookId,
    },

    /// A new book was rejected before it reached the catalog.
    #[error("invalid book: {message}")]
    InvalidEntry {
        /// What was wrong with it.
        message: String,
    },
}

impl CatalogError {
    /// Creates an invalid admission format error.
    pub fn invalid_admission(value: impl Into<String>) -> Self {
        Self::InvalidAdmissionFormat {
            value: value.into(),
        }
    }

    /// Creates an invalid entry error.
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_message_names_format() {
        let message = CatalogError::invalid_admission("XY1").to_string();
        assert!(message.contains("GUYYYYNNNNN"));
        assert!(message.contains("GU202300123"));
        assert!(message.contains("\"XY1\""));
    }

    #[test]
    fn field_mismatch_message_names_subject() {
        let message = CatalogError::FieldMismatch {
            id: 1,
            subject: "C".into(),
            field: "Law".into(),
        }
        .to_string();
        assert!(message.contains("(C)"));
        assert!(message.contains("\"Law\""));
    }
}
