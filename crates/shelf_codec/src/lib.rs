//! # Shelf Codec
//!
//! Line codec for shelf catalog records.
//!
//! Every catalog entry is stored as one line of six comma-separated fields:
//!
//! ```text
//! id,title,author,available,subject,borrowedBy
//! ```
//!
//! ## Format Rules
//!
//! - `available` is written as `true` or `false`; on read anything other
//!   than `true` (in any case) means not available
//! - `subject` holds the language for programming books ("Java", "Python",
//!   "C") and the subject name for everything else
//! - `borrowedBy` is empty when nobody holds the book, so such lines end in
//!   a trailing comma
//! - A line with fewer than six fields, or a non-numeric id, is rejected;
//!   [`decode_document`] skips such lines instead of failing
//!
//! ## Usage
//!
//! ```
//! use shelf_codec::{decode_line, encode_line};
//!
//! let entry = decode_line("1,Let Us C,Yashavant Kanetkar,true,C,").unwrap();
//! assert_eq!(entry.category_label(), "Programming");
//! assert_eq!(entry.language(), Some("C"));
//! assert_eq!(encode_line(&entry), "1,Let Us C,Yashavant Kanetkar,true,C,");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod entry;
mod error;

pub use decoder::{
    decode_document, decode_line, DecodeReport, SkippedLine, FIELD_COUNT, FIELD_DELIMITER,
};
pub use encoder::{encode_document, encode_line};
pub use entry::{
    BookEntry, BookId, Category, Subject, KNOWN_LANGUAGES, PROGRAMMING, UNKNOWN_LANGUAGE,
};
pub use error::{CodecError, CodecResult};
