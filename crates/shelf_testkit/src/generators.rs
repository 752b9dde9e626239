//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that respects the catalog's input rules.

use proptest::prelude::*;
use shelf_codec::{BookId, Category, KNOWN_LANGUAGES};
use shelf_core::NewBook;

/// Strategy for well-formed admission numbers.
pub fn admission_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("GU[0-9]{9}").expect("Invalid regex")
}

/// Strategy for text that is never a well-formed admission number.
pub fn invalid_admission_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("GU[0-9]{0,8}").expect("Invalid regex"),
        prop::string::string_regex("GU[0-9]{10,12}").expect("Invalid regex"),
        prop::string::string_regex("[a-z]{2}[0-9]{9}").expect("Invalid regex"),
        prop::string::string_regex("GU[0-9]{4}[A-Z][0-9]{4}").expect("Invalid regex"),
    ]
}

/// Strategy for titles and authors that are safe to store.
pub fn title_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 :&'.-]{0,30}").expect("Invalid regex")
}

/// Strategy for categories.
pub fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Strategy for a student's stated field of study.
///
/// Covers every category name and every known language in mixed case,
/// so both matches and mismatches occur.
pub fn field_strategy() -> impl Strategy<Value = String> {
    let mut names: Vec<String> = Category::ALL.iter().map(|c| c.as_str().to_string()).collect();
    names.extend(KNOWN_LANGUAGES.iter().map(|l| l.to_string()));
    (prop::sample::select(names), any::<bool>())
        .prop_map(|(name, upper)| if upper { name.to_uppercase() } else { name })
}

/// Strategy for valid new books with ids in `ids`.
pub fn new_book_strategy(ids: std::ops::RangeInclusive<BookId>) -> impl Strategy<Value = NewBook> {
    (
        ids,
        title_strategy(),
        prop_oneof![Just(String::new()), title_strategy()],
        category_strategy(),
        prop::sample::select(KNOWN_LANGUAGES.to_vec()),
    )
        .prop_map(|(id, title, author, category, language)| {
            let book = NewBook::new(id, title, author, category);
            if category == Category::Programming {
                book.with_language(language)
            } else {
                book
            }
        })
}
