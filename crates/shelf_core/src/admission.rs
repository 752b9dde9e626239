//! Student admission numbers.

use crate::error::{CatalogError, CatalogResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Human-readable shape of an admission number.
pub const ADMISSION_FORMAT: &str = "GUYYYYNNNNN";

/// A well-formed admission number, for messages.
pub const ADMISSION_EXAMPLE: &str = "GU202300123";

/// `GU`, a four-digit year, a five-digit serial. ASCII digits only.
static ADMISSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GU([0-9]{4})([0-9]{5})$").expect("admission pattern is a valid regex")
});

/// A validated student admission number such as `GU202300123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdmissionNumber {
    text: String,
    year: u16,
    serial: u32,
}

impl AdmissionNumber {
    /// Validates `text` as an admission number.
    ///
    /// The text must match exactly: no surrounding whitespace, upper-case
    /// `GU` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidAdmissionFormat`] if `text` does not
    /// have the shape `GUYYYYNNNNN`.
    pub fn parse(text: &str) -> CatalogResult<Self> {
        let captures = ADMISSION_PATTERN
            .captures(text)
            .ok_or_else(|| CatalogError::invalid_admission(text))?;

        let year = captures[1]
            .parse()
            .map_err(|_| CatalogError::invalid_admission(text))?;
        let serial = captures[2]
            .parse()
            .map_err(|_| CatalogError::invalid_admission(text))?;

        Ok(Self {
            text: text.to_string(),
            year,
            serial,
        })
    }

    /// Returns whether `text` is a well-formed admission number.
    #[must_use]
    pub fn is_valid(text: &str) -> bool {
        ADMISSION_PATTERN.is_match(text)
    }

    /// Returns the admission number as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the admission year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the serial within the year.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for AdmissionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for AdmissionNumber {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AdmissionNumber {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_valid() {
        let admission = AdmissionNumber::parse("GU202300123").unwrap();
        assert_eq!(admission.as_str(), "GU202300123");
        assert_eq!(admission.year(), 2023);
        assert_eq!(admission.serial(), 123);
        assert_eq!(admission.to_string(), "GU202300123");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in [
            "",
            "GU",
            "GU20230012",
            "GU2023001234",
            "gu202300123",
            "GX202300123",
            " GU202300123",
            "GU202300123 ",
            "GU2023OO123",
            "202300123GU",
            "GU２０２３00123",
        ] {
            assert!(
                matches!(
                    AdmissionNumber::parse(bad),
                    Err(CatalogError::InvalidAdmissionFormat { .. })
                ),
                "{bad:?} should be rejected"
            );
            assert!(!AdmissionNumber::is_valid(bad));
        }
    }

    #[test]
    fn from_str_matches_parse() {
        let admission: AdmissionNumber = "GU199912345".parse().unwrap();
        assert_eq!(admission.year(), 1999);
        assert_eq!(admission.serial(), 12345);
    }

    proptest! {
        #[test]
        fn any_nine_digits_accepted(digits in "[0-9]{9}") {
            let text = format!("GU{digits}");
            prop_assert!(AdmissionNumber::parse(&text).is_ok());
        }

        #[test]
        fn wrong_length_rejected(digits in "[0-9]{0,8}|[0-9]{10,12}") {
            let text = format!("GU{digits}");
            prop_assert!(AdmissionNumber::parse(&text).is_err());
        }
    }
}
