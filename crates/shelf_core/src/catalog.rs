//! Catalog facade: the books, the loans, and their persistence.

use crate::admission::AdmissionNumber;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::index::BorrowerIndex;
use crate::seed::seed_entries;
use crate::verify::{self, Inconsistency};
use shelf_codec::{
    decode_document, encode_document, BookEntry, BookId, Category, Subject, FIELD_DELIMITER,
};
use shelf_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Input for [`Catalog::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    /// Caller-chosen id; must be non-zero and unused.
    pub id: BookId,
    /// Title; must not be blank.
    pub title: String,
    /// Author; may be empty.
    pub author: String,
    /// Subject category.
    pub category: Category,
    /// Language, only used for [`Category::Programming`].
    pub language: Option<String>,
}

impl NewBook {
    /// Creates a new book description without a language.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category,
            language: None,
        }
    }

    /// Sets the programming language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.id == 0 {
            return Err(CatalogError::invalid_entry("id must be a positive number"));
        }
        if self.title.trim().is_empty() {
            return Err(CatalogError::invalid_entry("title must not be empty"));
        }
        check_text("title", &self.title)?;
        check_text("author", &self.author)?;
        if let Some(language) = &self.language {
            check_text("language", language)?;
        }
        Ok(())
    }
}

/// Rejects text that would split or end a stored record.
fn check_text(field: &str, value: &str) -> CatalogResult<()> {
    if value.contains(FIELD_DELIMITER) || value.contains(['\n', '\r']) {
        return Err(CatalogError::invalid_entry(format!(
            "{field} must not contain '{FIELD_DELIMITER}' or line breaks"
        )));
    }
    Ok(())
}

/// What happened when the catalog was read from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Entries loaded.
    pub loaded: usize,
    /// Lines that could not be decoded and were skipped.
    pub skipped: usize,
    /// Whether the store was missing and got the seed books.
    pub seeded: bool,
}

/// Everything a single operation may change.
#[derive(Debug, Clone, Default)]
struct CatalogState {
    entries: Vec<BookEntry>,
    borrowers: BorrowerIndex,
}

impl CatalogState {
    fn from_entries(entries: Vec<BookEntry>) -> Self {
        let borrowers = BorrowerIndex::rebuild(&entries);
        Self { entries, borrowers }
    }

    fn position(&self, id: BookId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn get_mut(&mut self, id: BookId) -> CatalogResult<&mut BookEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(CatalogError::NotFound { id })
    }
}

/// The library catalog.
///
/// `Catalog` owns the books (in insertion order, which is display order),
/// the index of active loans, and the backing store. The store is read once
/// when the catalog opens and rewritten in full after every successful
/// mutation.
///
/// Each mutating call is a single transaction: if it fails, whether on
/// validation or while saving, in-memory state is put back as it was.
///
/// # Example
///
/// ```rust
/// use shelf_core::{Catalog, NewBook};
/// use shelf_codec::Category;
///
/// let mut catalog = Catalog::open_in_memory().unwrap();
/// catalog
///     .add(
///         NewBook::new(11, "Clean Code", "Robert Martin", Category::Programming)
///             .with_language("Java"),
///     )
///     .unwrap();
///
/// catalog.borrow("GU202300123", 11, "java").unwrap();
/// assert!(!catalog.find_by_id(11).unwrap().is_available());
///
/// catalog.return_book("GU202300123").unwrap();
/// catalog.close().unwrap();
/// ```
pub struct Catalog {
    config: CatalogConfig,
    backend: Box<dyn StorageBackend>,
    state: CatalogState,
    last_load: LoadSummary,
}

impl Catalog {
    /// Opens the catalog stored in the text file at `path`.
    ///
    /// If the file does not exist the catalog starts with the seed books,
    /// which are written out immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if the
    /// seed books cannot be written.
    pub fn open(path: &Path) -> CatalogResult<Self> {
        Self::open_with_config(path, CatalogConfig::default())
    }

    /// Opens the catalog at `path` with a custom configuration.
    ///
    /// # Errors
    ///
    /// See [`Catalog::open`].
    pub fn open_with_config(path: &Path, config: CatalogConfig) -> CatalogResult<Self> {
        let backend = if config.create_dirs {
            FileBackend::open_with_create_dirs(path)?
        } else {
            FileBackend::open(path)
        };
        let backend = backend.with_sync(config.sync_on_save);
        Self::open_with_backend(config, Box::new(backend))
    }

    /// Opens a catalog that lives only in memory, starting from the seed books.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other constructors.
    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::open_with_backend(CatalogConfig::default(), Box::new(InMemoryBackend::new()))
    }

    /// Opens a catalog over an arbitrary backing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or if it is missing and
    /// the seed books cannot be written.
    pub fn open_with_backend(
        config: CatalogConfig,
        backend: Box<dyn StorageBackend>,
    ) -> CatalogResult<Self> {
        let mut catalog = Self {
            config,
            backend,
            state: CatalogState::default(),
            last_load: LoadSummary::default(),
        };
        catalog.reload()?;
        Ok(catalog)
    }

    /// Discards in-memory state and reads the backing store again.
    ///
    /// Lines that cannot be decoded are skipped and logged. A missing store
    /// is seeded when the configuration allows it, otherwise the catalog
    /// starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the seed books cannot
    /// be saved. In-memory state is unchanged in that case.
    pub fn reload(&mut self) -> CatalogResult<LoadSummary> {
        let location = self.backend.describe();

        let (state, summary) = match self.backend.load()? {
            Some(text) => {
                let report = decode_document(&text);
                for skipped in &report.skipped {
                    warn!(
                        store = %location,
                        line = skipped.line_number,
                        error = %skipped.error,
                        "skipping unreadable record"
                    );
                }
                let summary = LoadSummary {
                    loaded: report.entries.len(),
                    skipped: report.skipped.len(),
                    seeded: false,
                };
                (CatalogState::from_entries(report.entries), summary)
            }
            None if self.config.seed_if_missing => {
                let state = CatalogState::from_entries(seed_entries());
                let summary = LoadSummary {
                    loaded: state.entries.len(),
                    skipped: 0,
                    seeded: true,
                };
                (state, summary)
            }
            None => (CatalogState::default(), LoadSummary::default()),
        };

        if summary.seeded {
            self.backend.replace(&encode_document(&state.entries))?;
            info!(store = %location, books = summary.loaded, "created catalog with seed books");
        }

        self.state = state;
        self.last_load = summary;

        for problem in self.verify() {
            warn!(store = %location, %problem, "catalog inconsistency");
        }
        info!(
            store = %location,
            books = summary.loaded,
            skipped = summary.skipped,
            loans = self.state.borrowers.len(),
            "catalog loaded"
        );
        Ok(summary)
    }

    /// Returns what the most recent load found.
    #[must_use]
    pub const fn load_summary(&self) -> LoadSummary {
        self.last_load
    }

    /// Rewrites the backing store with every entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the write fails. In-memory state
    /// is untouched and the call may be retried.
    pub fn save(&mut self) -> CatalogResult<()> {
        let document = encode_document(&self.state.entries);
        self.backend.replace(&document)?;
        debug!(books = self.state.entries.len(), "catalog saved");
        Ok(())
    }

    /// Saves one last time and releases the store.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the final save fails.
    pub fn close(mut self) -> CatalogResult<()> {
        self.save()?;
        info!(store = %self.backend.describe(), "catalog closed");
        Ok(())
    }

    /// Runs `f` against the state and saves; restores the state on any error.
    fn transaction<F, T>(&mut self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut CatalogState) -> CatalogResult<T>,
    {
        let snapshot = self.state.clone();
        let result = f(&mut self.state).and_then(|value| {
            self.save()?;
            Ok(value)
        });
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    /// Adds a new, available book.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidEntry`] if the id is zero, the title is
    ///   blank, or any text contains a comma or line break
    /// - [`CatalogError::DuplicateId`] if the id is taken
    /// - [`CatalogError::Storage`] if the catalog cannot be saved
    pub fn add(&mut self, book: NewBook) -> CatalogResult<BookEntry> {
        book.validate()?;
        let subject = Subject::for_category(book.category, book.language.as_deref());
        let entry = BookEntry::new(book.id, book.title, book.author, subject);

        let added = self.transaction(|state| {
            if state.position(entry.id()).is_some() {
                return Err(CatalogError::DuplicateId { id: entry.id() });
            }
            state.entries.push(entry.clone());
            Ok(entry)
        })?;

        debug!(id = added.id(), title = added.title(), "book added");
        Ok(added)
    }

    /// Removes a book that is on the shelf.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no book has the id
    /// - [`CatalogError::StillBorrowed`] if the book is on loan
    /// - [`CatalogError::Storage`] if the catalog cannot be saved
    pub fn delete(&mut self, id: BookId) -> CatalogResult<BookEntry> {
        let removed = self.transaction(|state| {
            let position = state.position(id).ok_or(CatalogError::NotFound { id })?;
            if !state.entries[position].is_available() {
                return Err(CatalogError::StillBorrowed { id });
            }
            Ok(state.entries.remove(position))
        })?;

        debug!(id, title = removed.title(), "book deleted");
        Ok(removed)
    }

    /// Finds a book by id.
    #[must_use]
    pub fn find_by_id(&self, id: BookId) -> Option<&BookEntry> {
        self.state.entries.iter().find(|e| e.id() == id)
    }

    /// Iterates over books whose title contains `keyword`, ignoring case.
    ///
    /// The search is lazy and reads current state each time it is called.
    /// An empty keyword matches every book.
    pub fn search_by_title<'a>(
        &'a self,
        keyword: &str,
    ) -> impl Iterator<Item = &'a BookEntry> + 'a {
        let needle = keyword.to_lowercase();
        self.state
            .entries
            .iter()
            .filter(move |e| e.title().to_lowercase().contains(&needle))
    }

    /// Lends a book to a student.
    ///
    /// `student_field` is compared, ignoring case, with the book's effective
    /// subject: the subject name for general books and the language (not
    /// "Programming") for programming books.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`CatalogError::InvalidAdmissionFormat`] if `admission` is not `GUYYYYNNNNN`
    /// - [`CatalogError::AlreadyBorrowing`] if the student already holds a book
    /// - [`CatalogError::NotFound`] if no book has the id
    /// - [`CatalogError::NotAvailable`] if the book is on loan
    /// - [`CatalogError::FieldMismatch`] if the field does not match the subject
    /// - [`CatalogError::Storage`] if the catalog cannot be saved
    pub fn borrow(
        &mut self,
        admission: &str,
        book_id: BookId,
        student_field: &str,
    ) -> CatalogResult<BookEntry> {
        let admission = AdmissionNumber::parse(admission)?;

        let lent = self.transaction(|state| {
            if let Some(held) = state.borrowers.get(admission.as_str()) {
                return Err(CatalogError::AlreadyBorrowing {
                    admission: admission.to_string(),
                    book_id: held,
                });
            }

            let entry = state.get_mut(book_id)?;
            if !entry.is_available() {
                return Err(CatalogError::NotAvailable { id: book_id });
            }
            if !same_text(student_field, entry.effective_subject()) {
                return Err(CatalogError::FieldMismatch {
                    id: book_id,
                    subject: entry.effective_subject().to_string(),
                    field: student_field.to_string(),
                });
            }

            // A stale borrower left on an available record must not keep a loan
            let stale = entry.borrowed_by().map(str::to_string);
            entry.lend_to(admission.as_str());
            let lent = entry.clone();

            if let Some(stale) = stale {
                state.borrowers.remove_if(&stale, book_id);
            }
            state.borrowers.insert(admission.as_str(), book_id);
            Ok(lent)
        })?;

        debug!(id = book_id, admission = %admission, "book borrowed");
        Ok(lent)
    }

    /// Takes back the book a student holds.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`CatalogError::InvalidAdmissionFormat`] if `admission` is not `GUYYYYNNNNN`
    /// - [`CatalogError::NoActiveLoan`] if the student holds nothing
    /// - [`CatalogError::InconsistentState`] if the loan names a book that no
    ///   longer exists; the stale loan is dropped before returning
    /// - [`CatalogError::Storage`] if the catalog cannot be saved
    pub fn return_book(&mut self, admission: &str) -> CatalogResult<BookEntry> {
        let admission = AdmissionNumber::parse(admission)?;

        let book_id = self
            .state
            .borrowers
            .get(admission.as_str())
            .ok_or_else(|| CatalogError::NoActiveLoan {
                admission: admission.to_string(),
            })?;

        if self.find_by_id(book_id).is_none() {
            self.state.borrowers.remove(admission.as_str());
            warn!(admission = %admission, book_id, "dropped loan for missing book");
            return Err(CatalogError::InconsistentState {
                admission: admission.to_string(),
                book_id,
            });
        }

        let returned = self.transaction(|state| {
            let entry = state.get_mut(book_id)?;
            entry.receive_back();
            let returned = entry.clone();
            state.borrowers.remove(admission.as_str());
            Ok(returned)
        })?;

        debug!(id = book_id, admission = %admission, "book returned");
        Ok(returned)
    }

    /// Returns every book in display order.
    #[must_use]
    pub fn entries(&self) -> &[BookEntry] {
        &self.state.entries
    }

    /// Returns the number of books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    /// Returns whether the catalog has no books.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    /// Iterates over active loans as `(admission number, book id)`.
    pub fn loans(&self) -> impl Iterator<Item = (&str, BookId)> + '_ {
        self.state.borrowers.iter()
    }

    /// Returns the book on loan to `admission`, if any.
    #[must_use]
    pub fn loan_of(&self, admission: &str) -> Option<BookId> {
        self.state.borrowers.get(admission)
    }

    /// Checks entries and loans against each other.
    #[must_use]
    pub fn verify(&self) -> Vec<Inconsistency> {
        verify::check(&self.state.entries, &self.state.borrowers)
    }

    /// Returns the configuration the catalog was opened with.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Returns a description of where the catalog is stored.
    #[must_use]
    pub fn location(&self) -> String {
        self.backend.describe()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("store", &self.backend.describe())
            .field("books", &self.state.entries.len())
            .field("loans", &self.state.borrowers.len())
            .finish()
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STUDENT: &str = "GU202300123";
    const OTHER: &str = "GU202300999";

    fn empty_catalog() -> (Catalog, InMemoryBackend) {
        let backend = InMemoryBackend::new();
        let catalog = Catalog::open_with_backend(
            CatalogConfig::new().seed_if_missing(false),
            Box::new(backend.clone()),
        )
        .unwrap();
        (catalog, backend)
    }

    fn seeded_catalog() -> (Catalog, InMemoryBackend) {
        let backend = InMemoryBackend::new();
        let catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend.clone()))
                .unwrap();
        (catalog, backend)
    }

    fn let_us_c() -> NewBook {
        NewBook::new(1, "Let Us C", "Kanetkar", Category::Programming).with_language("C")
    }

    #[test]
    fn missing_store_is_seeded_and_saved() {
        let (catalog, backend) = seeded_catalog();

        assert_eq!(catalog.len(), 10);
        assert!(catalog.load_summary().seeded);
        assert_eq!(backend.write_count(), 1);
        assert_eq!(backend.document().unwrap().lines().count(), 10);
    }

    #[test]
    fn missing_store_without_seeding_is_empty_and_unwritten() {
        let (catalog, backend) = empty_catalog();

        assert!(catalog.is_empty());
        assert!(!catalog.load_summary().seeded);
        assert!(backend.document().is_none());
    }

    #[test]
    fn existing_empty_store_is_not_seeded() {
        let backend = InMemoryBackend::with_document("");
        let catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend)).unwrap();

        assert!(catalog.is_empty());
        assert!(!catalog.load_summary().seeded);
    }

    #[test]
    fn load_skips_malformed_line() {
        let backend = InMemoryBackend::with_document(
            "1,Let Us C,Kanetkar,true,C,\n2,Half,Line\n",
        );
        let catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend)).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.load_summary(),
            LoadSummary {
                loaded: 1,
                skipped: 1,
                seeded: false
            }
        );
    }

    #[test]
    fn load_rebuilds_borrower_index() {
        let backend = InMemoryBackend::with_document(
            "1,Let Us C,Kanetkar,false,C,GU202300123\n2,Head First Python,Barry,true,Python,\n",
        );
        let catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend)).unwrap();

        assert_eq!(catalog.loan_of(STUDENT), Some(1));
        assert_eq!(catalog.loans().count(), 1);
        assert!(catalog.verify().is_empty());
    }

    #[test]
    fn add_creates_available_entry_and_saves() {
        let (mut catalog, backend) = empty_catalog();

        let added = catalog.add(let_us_c()).unwrap();
        assert!(added.is_available());
        assert_eq!(added.borrowed_by(), None);
        assert_eq!(added.language(), Some("C"));
        assert_eq!(
            backend.document().as_deref(),
            Some("1,Let Us C,Kanetkar,true,C,\n")
        );
    }

    #[test]
    fn add_duplicate_id_rejected() {
        let (mut catalog, backend) = seeded_catalog();
        let writes = backend.write_count();

        let result = catalog.add(NewBook::new(3, "Another", "Someone", Category::Law));
        assert!(matches!(result, Err(CatalogError::DuplicateId { id: 3 })));
        assert_eq!(catalog.len(), 10);
        assert_eq!(backend.write_count(), writes);
    }

    #[test]
    fn add_rejects_bad_text() {
        let (mut catalog, _) = empty_catalog();

        for book in [
            NewBook::new(0, "Zero", "", Category::Law),
            NewBook::new(1, "  ", "", Category::Law),
            NewBook::new(1, "Comma, Title", "", Category::Law),
            NewBook::new(1, "Title", "Line\nBreak", Category::Law),
            NewBook::new(1, "Title", "", Category::Programming).with_language("C,Java"),
        ] {
            assert!(
                matches!(catalog.add(book.clone()), Err(CatalogError::InvalidEntry { .. })),
                "{book:?} should be rejected"
            );
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn add_then_delete_restores_content() {
        let (mut catalog, backend) = seeded_catalog();
        let before = backend.document();

        catalog.add(NewBook::new(42, "Temporary", "Nobody", Category::Maths)).unwrap();
        catalog.delete(42).unwrap();

        assert_eq!(backend.document(), before);
        // The id is free again
        catalog.add(NewBook::new(42, "Again", "Nobody", Category::Maths)).unwrap();
    }

    #[test]
    fn delete_missing() {
        let (mut catalog, _) = seeded_catalog();
        assert!(matches!(catalog.delete(99), Err(CatalogError::NotFound { id: 99 })));
    }

    #[test]
    fn delete_borrowed_rejected() {
        let (mut catalog, backend) = seeded_catalog();
        catalog.borrow(STUDENT, 9, "Law").unwrap();
        let before = backend.document();

        assert!(matches!(catalog.delete(9), Err(CatalogError::StillBorrowed { id: 9 })));
        assert_eq!(catalog.len(), 10);
        assert_eq!(backend.document(), before);
    }

    #[test]
    fn find_by_id() {
        let (catalog, _) = seeded_catalog();
        assert_eq!(catalog.find_by_id(4).unwrap().title(), "Computer Networking");
        assert!(catalog.find_by_id(11).is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let (catalog, _) = seeded_catalog();

        let hits: Vec<_> = catalog.search_by_title("let").map(BookEntry::id).collect();
        assert_eq!(hits, vec![1]);

        let hits: Vec<_> = catalog.search_by_title("CONCEPTS").map(BookEntry::id).collect();
        assert_eq!(hits, vec![5]);

        assert_eq!(catalog.search_by_title("zzz").count(), 0);
        assert_eq!(catalog.search_by_title("").count(), 10);
    }

    #[test]
    fn search_reflects_current_state() {
        let (mut catalog, _) = seeded_catalog();
        assert_eq!(catalog.search_by_title("python").count(), 1);

        catalog
            .add(
                NewBook::new(11, "Fluent Python", "Ramalho", Category::Programming)
                    .with_language("Python"),
            )
            .unwrap();
        assert_eq!(catalog.search_by_title("python").count(), 2);
    }

    #[test]
    fn borrow_and_return_scenario() {
        let (mut catalog, backend) = empty_catalog();
        catalog.add(let_us_c()).unwrap();

        let lent = catalog.borrow(STUDENT, 1, "C").unwrap();
        assert!(!lent.is_available());
        assert_eq!(lent.borrowed_by(), Some(STUDENT));
        assert_eq!(
            backend.document().as_deref(),
            Some("1,Let Us C,Kanetkar,false,C,GU202300123\n")
        );

        assert!(matches!(
            catalog.borrow(OTHER, 1, "C"),
            Err(CatalogError::NotAvailable { id: 1 })
        ));

        let returned = catalog.return_book(STUDENT).unwrap();
        assert!(returned.is_available());
        assert_eq!(returned.borrowed_by(), None);
        assert!(catalog.find_by_id(1).unwrap().is_available());
        assert_eq!(catalog.loan_of(STUDENT), None);

        // Free to borrow again
        catalog.borrow(STUDENT, 1, "c").unwrap();
    }

    #[test]
    fn borrow_one_loan_per_student() {
        let (mut catalog, _) = seeded_catalog();
        catalog.borrow(STUDENT, 4, "Engineering").unwrap();

        let result = catalog.borrow(STUDENT, 5, "Engineering");
        assert!(matches!(
            result,
            Err(CatalogError::AlreadyBorrowing { book_id: 4, .. })
        ));
        assert!(catalog.find_by_id(5).unwrap().is_available());
    }

    #[test]
    fn already_borrowing_checked_before_book_lookup() {
        let (mut catalog, _) = seeded_catalog();
        catalog.borrow(STUDENT, 4, "Engineering").unwrap();

        assert!(matches!(
            catalog.borrow(STUDENT, 99, "Engineering"),
            Err(CatalogError::AlreadyBorrowing { .. })
        ));
    }

    #[test]
    fn borrow_unknown_book() {
        let (mut catalog, _) = seeded_catalog();
        assert!(matches!(
            catalog.borrow(STUDENT, 99, "Law"),
            Err(CatalogError::NotFound { id: 99 })
        ));
    }

    #[test]
    fn borrow_field_must_match_language() {
        let (mut catalog, _) = seeded_catalog();

        assert!(matches!(
            catalog.borrow(STUDENT, 2, "Programming"),
            Err(CatalogError::FieldMismatch { id: 2, .. })
        ));
        assert!(matches!(
            catalog.borrow(STUDENT, 9, "Commerce"),
            Err(CatalogError::FieldMismatch { id: 9, .. })
        ));
        assert_eq!(catalog.loans().count(), 0);

        catalog.borrow(STUDENT, 2, "JAVA").unwrap();
    }

    #[test]
    fn invalid_admission_rejected_without_mutation() {
        let (mut catalog, backend) = seeded_catalog();
        let writes = backend.write_count();

        for bad in ["GU2023", "gu202300123", "AB202300123", "GU20230012X"] {
            assert!(matches!(
                catalog.borrow(bad, 1, "C"),
                Err(CatalogError::InvalidAdmissionFormat { .. })
            ));
            assert!(matches!(
                catalog.return_book(bad),
                Err(CatalogError::InvalidAdmissionFormat { .. })
            ));
        }
        assert!(catalog.find_by_id(1).unwrap().is_available());
        assert_eq!(backend.write_count(), writes);
    }

    #[test]
    fn return_without_loan() {
        let (mut catalog, _) = seeded_catalog();
        assert!(matches!(
            catalog.return_book(STUDENT),
            Err(CatalogError::NoActiveLoan { .. })
        ));
    }

    #[test]
    fn return_self_heals_dangling_loan() {
        let backend = InMemoryBackend::with_document(
            "1,Let Us C,Kanetkar,true,C,\n",
        );
        let mut catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend)).unwrap();
        // Force the index out of step with the entries
        catalog.state.borrowers.insert(STUDENT, 77);

        let result = catalog.return_book(STUDENT);
        assert!(matches!(
            result,
            Err(CatalogError::InconsistentState { book_id: 77, .. })
        ));
        assert_eq!(catalog.loan_of(STUDENT), None);
        assert!(matches!(
            catalog.return_book(STUDENT),
            Err(CatalogError::NoActiveLoan { .. })
        ));
        catalog.borrow(STUDENT, 1, "C").unwrap();
    }

    #[test]
    fn borrow_clears_stale_borrower_on_available_record() {
        let backend = InMemoryBackend::with_document("1,Let Us C,Kanetkar,true,C,GU202300999\n");
        let mut catalog =
            Catalog::open_with_backend(CatalogConfig::default(), Box::new(backend)).unwrap();
        assert_eq!(catalog.verify().len(), 1);

        catalog.borrow(STUDENT, 1, "C").unwrap();
        assert_eq!(catalog.loan_of(OTHER), None);
        assert_eq!(catalog.loan_of(STUDENT), Some(1));
        assert!(catalog.verify().is_empty());
    }

    #[test]
    fn failed_save_rolls_back() {
        let (mut catalog, backend) = seeded_catalog();
        let before = backend.document();
        backend.fail_writes(true);

        assert!(matches!(
            catalog.add(NewBook::new(11, "New", "Author", Category::Law)),
            Err(CatalogError::Storage(_))
        ));
        assert!(catalog.find_by_id(11).is_none());

        assert!(matches!(
            catalog.borrow(STUDENT, 9, "Law"),
            Err(CatalogError::Storage(_))
        ));
        assert!(catalog.find_by_id(9).unwrap().is_available());
        assert_eq!(catalog.loan_of(STUDENT), None);

        assert!(matches!(catalog.delete(1), Err(CatalogError::Storage(_))));
        assert_eq!(catalog.len(), 10);
        assert_eq!(backend.document(), before);

        backend.fail_writes(false);
        catalog.borrow(STUDENT, 9, "Law").unwrap();
        assert_eq!(catalog.loan_of(STUDENT), Some(9));
    }

    #[test]
    fn failed_return_save_keeps_loan() {
        let (mut catalog, backend) = seeded_catalog();
        catalog.borrow(STUDENT, 9, "Law").unwrap();
        backend.fail_writes(true);

        assert!(matches!(catalog.return_book(STUDENT), Err(CatalogError::Storage(_))));
        assert_eq!(catalog.loan_of(STUDENT), Some(9));
        assert!(!catalog.find_by_id(9).unwrap().is_available());

        backend.fail_writes(false);
        catalog.return_book(STUDENT).unwrap();
    }

    #[test]
    fn save_retry_after_failure() {
        let (mut catalog, backend) = seeded_catalog();
        backend.fail_writes(true);
        assert!(catalog.save().is_err());

        backend.fail_writes(false);
        catalog.save().unwrap();
    }

    #[test]
    fn reload_discards_unsaved_view() {
        let (mut catalog, backend) = seeded_catalog();
        catalog.state.entries.clear();

        let summary = catalog.reload().unwrap();
        assert_eq!(summary.loaded, 10);
        assert!(!summary.seeded);
        assert_eq!(catalog.len(), 10);
        assert!(backend.document().is_some());
    }

    #[test]
    fn file_catalog_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.txt");

        {
            let mut catalog = Catalog::open(&path).unwrap();
            assert!(catalog.load_summary().seeded);
            catalog.borrow(STUDENT, 3, "python").unwrap();
            catalog.close().unwrap();
        }

        let catalog = Catalog::open(&path).unwrap();
        assert!(!catalog.load_summary().seeded);
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.loan_of(STUDENT), Some(3));
        assert_eq!(catalog.find_by_id(3).unwrap().borrowed_by(), Some(STUDENT));
    }

    #[test]
    fn file_catalog_loads_around_non_utf8_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.txt");
        std::fs::write(
            &path,
            b"1,Let Us C,Kanetkar,true,C,\n2,Caf\xe9,Someone,true,Law,\nx,Bad\xff,,true,Law,\n",
        )
        .unwrap();

        let catalog =
            Catalog::open_with_config(&path, CatalogConfig::new().sync_on_save(false)).unwrap();

        assert_eq!(catalog.find_by_id(1).unwrap().title(), "Let Us C");
        assert_eq!(catalog.find_by_id(2).unwrap().title(), "Caf\u{FFFD}");
        assert_eq!(
            catalog.load_summary(),
            LoadSummary {
                loaded: 2,
                skipped: 1,
                seeded: false
            }
        );
    }

    #[test]
    fn file_catalog_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("books.txt");

        let catalog = Catalog::open(&path).unwrap();
        assert_eq!(catalog.len(), 10);
        assert!(path.exists());
    }

    #[test]
    fn file_catalog_without_create_dirs_fails_to_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("books.txt");

        let result = Catalog::open_with_config(&path, CatalogConfig::new().create_dirs(false));
        assert!(matches!(result, Err(CatalogError::Storage(_))));
    }

    #[test]
    fn debug_output_is_summary() {
        let (catalog, _) = seeded_catalog();
        let debug = format!("{catalog:?}");
        assert!(debug.contains("books: 10"));
        assert!(debug.contains("<memory>"));
    }
}
