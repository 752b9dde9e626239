//! Consistency checks between entries and the borrower index.

use crate::index::BorrowerIndex;
use shelf_codec::{BookEntry, BookId};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A disagreement found in catalog state.
///
/// The catalog never produces these itself; they come from hand-edited or
/// otherwise damaged stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// Two entries share an id.
    DuplicateId {
        /// The shared id.
        id: BookId,
    },
    /// An available entry still names a borrower.
    BorrowerOnAvailableBook {
        /// The entry.
        id: BookId,
        /// The borrower it names.
        borrower: String,
    },
    /// An entry on loan names no borrower.
    MissingBorrower {
        /// The entry.
        id: BookId,
    },
    /// One borrower is named by more than one entry.
    DuplicateBorrower {
        /// The borrower.
        borrower: String,
        /// Every entry naming the borrower.
        ids: Vec<BookId>,
    },
    /// The index points at an id that no entry has.
    DanglingLoan {
        /// The borrower.
        admission: String,
        /// The missing id.
        book_id: BookId,
    },
    /// The index and the entry disagree about who holds the book.
    LoanMismatch {
        /// The borrower according to the index.
        admission: String,
        /// The book according to the index.
        book_id: BookId,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "id {id} is used by more than one book"),
            Self::BorrowerOnAvailableBook { id, borrower } => {
                write!(f, "book {id} is available but names borrower {borrower}")
            }
            Self::MissingBorrower { id } => write!(f, "book {id} is on loan but names no borrower"),
            Self::DuplicateBorrower { borrower, ids } => {
                write!(f, "{borrower} is recorded as holding books {ids:?}")
            }
            Self::DanglingLoan { admission, book_id } => {
                write!(f, "loan for {admission} points to missing book {book_id}")
            }
            Self::LoanMismatch { admission, book_id } => write!(
                f,
                "loan for {admission} points to book {book_id}, which names a different borrower"
            ),
        }
    }
}

/// Checks entries and index against each other.
pub(crate) fn check(entries: &[BookEntry], borrowers: &BorrowerIndex) -> Vec<Inconsistency> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut holders: HashMap<&str, Vec<BookId>> = HashMap::new();

    for entry in entries {
        if !seen.insert(entry.id()) {
            found.push(Inconsistency::DuplicateId { id: entry.id() });
        }
        match (entry.is_available(), entry.borrowed_by()) {
            (true, Some(borrower)) => found.push(Inconsistency::BorrowerOnAvailableBook {
                id: entry.id(),
                borrower: borrower.to_string(),
            }),
            (false, None) => found.push(Inconsistency::MissingBorrower { id: entry.id() }),
            _ => {}
        }
        if let Some(borrower) = entry.borrowed_by() {
            holders.entry(borrower).or_default().push(entry.id());
        }
    }

    let mut duplicated: Vec<_> = holders.into_iter().filter(|(_, ids)| ids.len() > 1).collect();
    duplicated.sort();
    found.extend(duplicated.into_iter().map(|(borrower, ids)| {
        Inconsistency::DuplicateBorrower {
            borrower: borrower.to_string(),
            ids,
        }
    }));

    for (admission, book_id) in borrowers.iter() {
        match entries.iter().find(|e| e.id() == book_id) {
            None => found.push(Inconsistency::DanglingLoan {
                admission: admission.to_string(),
                book_id,
            }),
            Some(entry) if entry.borrowed_by() != Some(admission) => {
                found.push(Inconsistency::LoanMismatch {
                    admission: admission.to_string(),
                    book_id,
                });
            }
            Some(_) => {}
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_codec::{decode_line, Subject};

    #[test]
    fn consistent_state_has_no_findings() {
        let mut lent = BookEntry::new(2, "B", "", Subject::General("Law".into()));
        lent.lend_to("GU202300001");
        let entries = vec![BookEntry::new(1, "A", "", Subject::General("Law".into())), lent];
        let index = BorrowerIndex::rebuild(&entries);

        assert!(check(&entries, &index).is_empty());
    }

    #[test]
    fn flags_damaged_records() {
        let entries = vec![
            decode_line("1,A,,true,Law,GU202300001").unwrap(),
            decode_line("2,B,,false,Law,").unwrap(),
            decode_line("2,C,,true,Law,").unwrap(),
        ];
        let index = BorrowerIndex::rebuild(&entries);
        let found = check(&entries, &index);

        assert!(found.contains(&Inconsistency::DuplicateId { id: 2 }));
        assert!(found.contains(&Inconsistency::BorrowerOnAvailableBook {
            id: 1,
            borrower: "GU202300001".into()
        }));
        assert!(found.contains(&Inconsistency::MissingBorrower { id: 2 }));
    }

    #[test]
    fn flags_duplicate_borrower_and_mismatch() {
        let entries = vec![
            decode_line("1,A,,false,Law,GU202300001").unwrap(),
            decode_line("2,B,,false,Law,GU202300001").unwrap(),
        ];
        let mut index = BorrowerIndex::rebuild(&entries);
        index.insert("GU202300002", 1);
        let found = check(&entries, &index);

        assert!(found.contains(&Inconsistency::DuplicateBorrower {
            borrower: "GU202300001".into(),
            ids: vec![1, 2]
        }));
        assert!(found.contains(&Inconsistency::LoanMismatch {
            admission: "GU202300002".into(),
            book_id: 1
        }));
    }

    #[test]
    fn flags_dangling_loan() {
        let entries = vec![BookEntry::new(1, "A", "", Subject::General("Law".into()))];
        let mut index = BorrowerIndex::new();
        index.insert("GU202300001", 7);

        assert_eq!(
            check(&entries, &index),
            vec![Inconsistency::DanglingLoan {
                admission: "GU202300001".into(),
                book_id: 7
            }]
        );
    }
}
