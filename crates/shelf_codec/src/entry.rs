//! Catalog entry types.

use crate::error::CodecError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Primary key of a catalog entry.
pub type BookId = u32;

/// Programming languages recognised in the subject slot of a stored record.
pub const KNOWN_LANGUAGES: [&str; 3] = ["Java", "Python", "C"];

/// Language given to a programming book whose language was not recorded.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Label shown for every language entry.
pub const PROGRAMMING: &str = "Programming";

/// The subject categories offered when a book is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Forensic science.
    Forensic,
    /// Law.
    Law,
    /// Programming; books in this category also carry a language.
    Programming,
    /// Mathematics.
    Maths,
    /// Engineering.
    Engineering,
    /// Nursing.
    Nursing,
    /// Commerce.
    Commerce,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Category; 7] = [
        Category::Forensic,
        Category::Law,
        Category::Programming,
        Category::Maths,
        Category::Engineering,
        Category::Nursing,
        Category::Commerce,
    ];

    /// Returns the canonical name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Forensic => "Forensic",
            Category::Law => "Law",
            Category::Programming => PROGRAMMING,
            Category::Maths => "Maths",
            Category::Engineering => "Engineering",
            Category::Nursing => "Nursing",
            Category::Commerce => "Commerce",
        }
    }

    /// Resolves a 1-based menu choice ("1" through "7").
    #[must_use]
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodecError::unknown_category(s))
    }
}

/// What a book is about.
///
/// Both variants share one slot in the stored record. A language entry
/// stores its language there, a general entry stores its subject verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Subject {
    /// A general subject such as "Law" or "Engineering".
    General(String),
    /// A programming book written for a specific language.
    Language(String),
}

impl Subject {
    /// Interprets the subject slot of a stored record.
    ///
    /// A known language name (any case) becomes a language entry keeping the
    /// stored spelling. The bare word "Programming" becomes a language entry
    /// with an unknown language. Anything else is a general subject.
    #[must_use]
    pub fn from_field(field: &str) -> Self {
        if KNOWN_LANGUAGES
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(field))
        {
            Subject::Language(field.to_string())
        } else if field.eq_ignore_ascii_case(PROGRAMMING) {
            Subject::Language(UNKNOWN_LANGUAGE.to_string())
        } else {
            Subject::General(field.to_string())
        }
    }

    /// Builds the subject for a new book of the given category.
    ///
    /// `language` is only consulted for [`Category::Programming`]; a missing
    /// or blank language is recorded as [`UNKNOWN_LANGUAGE`].
    #[must_use]
    pub fn for_category(category: Category, language: Option<&str>) -> Self {
        match category {
            Category::Programming => {
                let language = language
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case(PROGRAMMING))
                    .unwrap_or(UNKNOWN_LANGUAGE);
                Subject::Language(language.to_string())
            }
            other => Subject::General(other.as_str().to_string()),
        }
    }

    /// The text a borrower's field of study is compared against, which is
    /// also what lands in the stored record.
    #[must_use]
    pub fn effective(&self) -> &str {
        match self {
            Subject::General(subject) | Subject::Language(subject) => subject,
        }
    }

    /// The category label shown in listings.
    #[must_use]
    pub fn category_label(&self) -> &str {
        match self {
            Subject::General(subject) => subject,
            Subject::Language(_) => PROGRAMMING,
        }
    }

    /// The language of a programming book.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Subject::General(_) => None,
            Subject::Language(language) => Some(language),
        }
    }
}

/// One catalog record.
///
/// `available` and `borrowed_by` are only changed together through
/// [`BookEntry::lend_to`] and [`BookEntry::receive_back`]. Records decoded
/// from storage are taken as found, so a hand-edited file can still produce
/// an entry that violates that pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    id: BookId,
    title: String,
    author: String,
    available: bool,
    subject: Subject,
    #[serde(skip_serializing_if = "Option::is_none")]
    borrowed_by: Option<String>,
}

impl BookEntry {
    /// Creates an available entry with no borrower.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        subject: Subject,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            available: true,
            subject,
            borrowed_by: None,
        }
    }

    /// Creates an entry from raw field values, exactly as stored.
    pub fn from_parts(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        available: bool,
        subject: Subject,
        borrowed_by: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            available,
            subject,
            borrowed_by,
        }
    }

    /// Returns the entry id.
    #[must_use]
    pub const fn id(&self) -> BookId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the author (may be empty).
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns whether the book is on the shelf.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Returns the subject.
    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Returns the language for a programming book.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.subject.language()
    }

    /// Returns the subject text used for field-of-study matching.
    #[must_use]
    pub fn effective_subject(&self) -> &str {
        self.subject.effective()
    }

    /// Returns the category label shown in listings.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.subject.category_label()
    }

    /// Returns the admission number of the current borrower.
    #[must_use]
    pub fn borrowed_by(&self) -> Option<&str> {
        self.borrowed_by.as_deref()
    }

    /// Marks the book as lent to `admission`.
    pub fn lend_to(&mut self, admission: impl Into<String>) {
        self.available = false;
        self.borrowed_by = Some(admission.into());
    }

    /// Marks the book as back on the shelf.
    pub fn receive_back(&mut self) {
        self.available = true;
        self.borrowed_by = None;
    }
}

impl fmt::Display for BookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} by {} - {} - ",
            self.id,
            self.title,
            self.author,
            self.category_label()
        )?;
        match (self.available, self.borrowed_by()) {
            (true, _) => f.write_str("Available")?,
            (false, Some(borrower)) => write!(f, "Borrowed by {borrower}")?,
            (false, None) => f.write_str("Borrowed")?,
        }
        if let Some(language) = self.language() {
            write!(f, " (Language: {language})")?;
        }
        Ok(())
    }
}
