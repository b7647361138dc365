//! ISBN input validation.

use crate::{Error, ErrorKind};

/// An ISBN that has passed the 10 to 13 digit format check.
///
/// Only the shape is checked, the check digit is not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Isbn(String);

impl Isbn {
    /// Parses an ISBN from user input, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Validation`] error is returned when the trimmed input is not made of 10 to 13
    /// ASCII digits.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let isbn = input.trim();
        if (10..=13).contains(&isbn.len()) && isbn.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(isbn.to_owned()))
        } else {
            Err(Error::new(
                ErrorKind::Validation,
                format!("'{isbn}' is not a 10 to 13 digit ISBN"),
            ))
        }
    }

    /// The ISBN digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
