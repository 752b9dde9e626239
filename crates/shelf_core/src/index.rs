//! Borrower index: who holds which book.

use shelf_codec::{BookEntry, BookId};
use std::collections::BTreeMap;
use tracing::warn;

/// Inverted index from admission number to the book on loan.
///
/// Keyed by the raw borrower text so that records loaded from storage are
/// indexed exactly as found; admission numbers are only validated when a
/// student borrows or returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowerIndex {
    loans: BTreeMap<String, BookId>,
}

impl BorrowerIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index from every entry that names a borrower.
    ///
    /// If two entries name the same borrower the later one wins.
    pub fn rebuild<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a BookEntry>,
    {
        let mut index = Self::new();
        for entry in entries {
            let Some(borrower) = entry.borrowed_by() else {
                continue;
            };
            if let Some(previous) = index.insert(borrower, entry.id()) {
                warn!(
                    borrower,
                    previous,
                    current = entry.id(),
                    "borrower holds more than one book; keeping the later record"
                );
            }
        }
        index
    }

    /// Records a loan, returning the book previously recorded for `admission`.
    pub fn insert(&mut self, admission: &str, book_id: BookId) -> Option<BookId> {
        self.loans.insert(admission.to_string(), book_id)
    }

    /// Removes the loan for `admission`, returning its book id.
    pub fn remove(&mut self, admission: &str) -> Option<BookId> {
        self.loans.remove(admission)
    }

    /// Removes the loan for `admission` only if it points at `book_id`.
    pub fn remove_if(&mut self, admission: &str, book_id: BookId) -> bool {
        if self.get(admission) == Some(book_id) {
            self.loans.remove(admission);
            true
        } else {
            false
        }
    }

    /// Returns the book on loan to `admission`.
    #[must_use]
    pub fn get(&self, admission: &str) -> Option<BookId> {
        self.loans.get(admission).copied()
    }

    /// Returns whether `admission` has a book on loan.
    #[must_use]
    pub fn contains(&self, admission: &str) -> bool {
        self.loans.contains_key(admission)
    }

    /// Returns the number of active loans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    /// Returns whether there are no active loans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Iterates over loans in admission-number order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, BookId)> + '_ {
        self.loans.iter().map(|(a, id)| (a.as_str(), *id))
    }
}
