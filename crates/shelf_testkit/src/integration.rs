//! Cross-crate integration test helpers.
//!
//! Provides a reference model of the catalog and a harness that applies the
//! same operation to the real catalog and the model, then checks they agree.

use crate::fixtures::TestCatalog;
use crate::generators::{
    admission_strategy, field_strategy, invalid_admission_strategy, new_book_strategy,
};
use proptest::prelude::*;
use shelf_codec::{decode_document, BookId, Subject};
use shelf_core::{AdmissionNumber, Catalog, CatalogError, CatalogResult, NewBook};
use std::collections::BTreeMap;

/// One catalog operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Add a book.
    Add(NewBook),
    /// Delete a book by id.
    Delete(BookId),
    /// Borrow a book.
    Borrow {
        /// Admission number as typed.
        admission: String,
        /// Requested book.
        book_id: BookId,
        /// Stated field of study.
        field: String,
    },
    /// Return whatever the student holds.
    Return {
        /// Admission number as typed.
        admission: String,
    },
}

/// The kind of result an operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation succeeded.
    Ok,
    /// [`CatalogError::DuplicateId`]
    DuplicateId,
    /// [`CatalogError::NotFound`]
    NotFound,
    /// [`CatalogError::StillBorrowed`]
    StillBorrowed,
    /// [`CatalogError::InvalidAdmissionFormat`]
    InvalidAdmissionFormat,
    /// [`CatalogError::AlreadyBorrowing`]
    AlreadyBorrowing,
    /// [`CatalogError::NotAvailable`]
    NotAvailable,
    /// [`CatalogError::FieldMismatch`]
    FieldMismatch,
    /// [`CatalogError::NoActiveLoan`]
    NoActiveLoan,
    /// [`CatalogError::InconsistentState`]
    InconsistentState,
    /// [`CatalogError::InvalidEntry`]
    InvalidEntry,
    /// [`CatalogError::Storage`]
    Storage,
}

impl Outcome {
    /// Classifies a catalog result.
    pub fn of<T>(result: &CatalogResult<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(CatalogError::DuplicateId { .. }) => Self::DuplicateId,
            Err(CatalogError::NotFound { .. }) => Self::NotFound,
            Err(CatalogError::StillBorrowed { .. }) => Self::StillBorrowed,
            Err(CatalogError::InvalidAdmissionFormat { .. }) => Self::InvalidAdmissionFormat,
            Err(CatalogError::AlreadyBorrowing { .. }) => Self::AlreadyBorrowing,
            Err(CatalogError::NotAvailable { .. }) => Self::NotAvailable,
            Err(CatalogError::FieldMismatch { .. }) => Self::FieldMismatch,
            Err(CatalogError::NoActiveLoan { .. }) => Self::NoActiveLoan,
            Err(CatalogError::InconsistentState { .. }) => Self::InconsistentState,
            Err(CatalogError::InvalidEntry { .. }) => Self::InvalidEntry,
            Err(CatalogError::Storage(_)) => Self::Storage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ModelBook {
    id: BookId,
    title: String,
    subject: String,
    borrower: Option<String>,
}

/// A deliberately naive reference model of the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogModel {
    books: Vec<ModelBook>,
    loans: BTreeMap<String, BookId>,
}

impl CatalogModel {
    /// Captures the current state of `catalog`.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            books: catalog
                .entries()
                .iter()
                .map(|e| ModelBook {
                    id: e.id(),
                    title: e.title().to_string(),
                    subject: e.effective_subject().to_string(),
                    borrower: e.borrowed_by().map(str::to_string),
                })
                .collect(),
            loans: catalog
                .loans()
                .map(|(a, id)| (a.to_string(), id))
                .collect(),
        }
    }

    fn book_mut(&mut self, id: BookId) -> Option<&mut ModelBook> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Applies `op` to the model and returns the outcome the catalog should report.
    pub fn apply(&mut self, op: &Operation) -> Outcome {
        match op {
            Operation::Add(book) => {
                if book.id == 0 || book.title.trim().is_empty() {
                    return Outcome::InvalidEntry;
                }
                if self.books.iter().any(|b| b.id == book.id) {
                    return Outcome::DuplicateId;
                }
                let subject = Subject::for_category(book.category, book.language.as_deref());
                self.books.push(ModelBook {
                    id: book.id,
                    title: book.title.clone(),
                    subject: subject.effective().to_string(),
                    borrower: None,
                });
                Outcome::Ok
            }
            Operation::Delete(id) => {
                let Some(position) = self.books.iter().position(|b| b.id == *id) else {
                    return Outcome::NotFound;
                };
                if self.books[position].borrower.is_some() {
                    return Outcome::StillBorrowed;
                }
                self.books.remove(position);
                Outcome::Ok
            }
            Operation::Borrow {
                admission,
                book_id,
                field,
            } => {
                if !AdmissionNumber::is_valid(admission) {
                    return Outcome::InvalidAdmissionFormat;
                }
                if self.loans.contains_key(admission) {
                    return Outcome::AlreadyBorrowing;
                }
                let Some(book) = self.book_mut(*book_id) else {
                    return Outcome::NotFound;
                };
                if book.borrower.is_some() {
                    return Outcome::NotAvailable;
                }
                if book.subject.to_lowercase() != field.to_lowercase() {
                    return Outcome::FieldMismatch;
                }
                book.borrower = Some(admission.clone());
                self.loans.insert(admission.clone(), *book_id);
                Outcome::Ok
            }
            Operation::Return { admission } => {
                if !AdmissionNumber::is_valid(admission) {
                    return Outcome::InvalidAdmissionFormat;
                }
                let Some(book_id) = self.loans.get(admission).copied() else {
                    return Outcome::NoActiveLoan;
                };
                self.loans.remove(admission);
                match self.book_mut(book_id) {
                    Some(book) => {
                        book.borrower = None;
                        Outcome::Ok
                    }
                    None => Outcome::InconsistentState,
                }
            }
        }
    }

    /// Panics if `catalog` disagrees with the model.
    pub fn assert_matches(&self, catalog: &Catalog) {
        let actual = Self::from_catalog(catalog);
        assert_eq!(actual.books, self.books, "catalog entries diverged from model");
        assert_eq!(actual.loans, self.loans, "catalog loans diverged from model");
        for entry in catalog.entries() {
            assert_eq!(
                entry.is_available(),
                entry.borrowed_by().is_none(),
                "availability of book {} disagrees with its borrower",
                entry.id()
            );
        }
    }
}

/// Runs operations against a catalog and a model side by side.
pub struct IntegrationHarness {
    /// The catalog under test.
    pub catalog: TestCatalog,
    model: CatalogModel,
    applied: usize,
}

impl IntegrationHarness {
    /// Creates a harness over an in-memory catalog holding the seed books.
    pub fn new() -> Self {
        Self::over(TestCatalog::memory())
    }

    /// Creates a harness over an existing test catalog.
    pub fn over(catalog: TestCatalog) -> Self {
        let model = CatalogModel::from_catalog(&catalog);
        Self {
            catalog,
            model,
            applied: 0,
        }
    }

    /// Applies `op` to both sides and checks they agree.
    pub fn run(&mut self, op: &Operation) -> Outcome {
        let expected = self.model.apply(op);
        let actual = match op {
            Operation::Add(book) => Outcome::of(&self.catalog.add(book.clone())),
            Operation::Delete(id) => Outcome::of(&self.catalog.delete(*id)),
            Operation::Borrow {
                admission,
                book_id,
                field,
            } => Outcome::of(&self.catalog.borrow(admission, *book_id, field)),
            Operation::Return { admission } => Outcome::of(&self.catalog.return_book(admission)),
        };
        self.applied += 1;

        assert_eq!(actual, expected, "operation #{} {op:?}", self.applied);
        self.model.assert_matches(&self.catalog);
        assert!(
            self.catalog.verify().is_empty(),
            "inconsistencies after {op:?}: {:?}",
            self.catalog.verify()
        );
        actual
    }

    /// Checks that the backing store decodes to exactly the in-memory entries.
    pub fn assert_store_matches(&self) {
        let document = self
            .catalog
            .stored_document()
            .expect("catalog should have been saved");
        let report = decode_document(&document);
        assert!(report.skipped.is_empty(), "store has unreadable lines");
        assert_eq!(report.entries.as_slice(), self.catalog.entries());
    }

    /// Returns the number of operations applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy for operations over ids 1..=14 and a small pool of students,
/// so collisions between operations are common.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    let student = prop_oneof![
        4 => prop::sample::select(vec![
            "GU202300001".to_string(),
            "GU202300002".to_string(),
            "GU202400003".to_string(),
        ]),
        1 => admission_strategy(),
        1 => invalid_admission_strategy(),
    ];

    prop_oneof![
        2 => new_book_strategy(1..=14).prop_map(Operation::Add),
        1 => (1..=14u32).prop_map(Operation::Delete),
        4 => (student.clone(), 1..=14u32, field_strategy()).prop_map(|(admission, book_id, field)| {
            Operation::Borrow {
                admission,
                book_id,
                field,
            }
        }),
        3 => student.prop_map(|admission| Operation::Return { admission }),
    ]
}
