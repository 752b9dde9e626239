//! Books placed in a brand-new catalog.

use shelf_codec::{BookEntry, Subject};

/// Returns the ten seed books, ids 1 through 10, all on the shelf.
#[must_use]
pub fn seed_entries() -> Vec<BookEntry> {
    let language = |l: &str| Subject::Language(l.to_string());
    let general = |s: &str| Subject::General(s.to_string());

    vec![
        BookEntry::new(1, "Let Us C", "Yashavant Kanetkar", language("C")),
        BookEntry::new(2, "Java: The Complete Reference", "Herbert Schildt", language("Java")),
        BookEntry::new(3, "Head First Python", "Paul Barry", language("Python")),
        BookEntry::new(4, "Computer Networking", "Kurose & Ross", general("Engineering")),
        BookEntry::new(5, "Operating System Concepts", "Silberschatz", general("Engineering")),
        BookEntry::new(6, "Introduction to Forensic Science", "Saferstein", general("Forensic")),
        BookEntry::new(7, "Principles of Marketing", "Philip Kotler", general("Commerce")),
        BookEntry::new(8, "Fundamentals of Nursing", "Barbara Kozier", general("Nursing")),
        BookEntry::new(9, "Legal Environment of Business", "Bagley", general("Law")),
        BookEntry::new(10, "Calculus: Early Transcendentals", "James Stewart", general("Maths")),
    ]
}
