//! The [`BookRecord`] model and its fixed column layout.

/// Human readable column headers, in display and export order.
pub const HEADERS: [&str; 7] = [
    "ISBN",
    "Title",
    "Author",
    "Publisher",
    "Publication Date",
    "LCCN",
    "Notes",
];

/// A single catalog entry plus the user's notes.
///
/// Every field is free text and defaults to empty. There is no identity beyond the ISBN by
/// convention, so two records with the same ISBN are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookRecord {
    /// ISBN-10 or ISBN-13 digits.
    pub isbn: String,
    /// Title of the book.
    pub title: String,
    /// Comma separated author names.
    pub author: String,
    /// Comma separated publisher names.
    pub publisher: String,
    /// Publication date as reported by the catalog.
    pub publish_date: String,
    /// Comma separated Library of Congress Control Numbers.
    pub lccn: String,
    /// Free text notes filled in by the user.
    pub notes: String,
}

/// The user editable fields of a [`BookRecord`]; the ISBN comes from the ISBN input instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// [`BookRecord::title`]
    Title,
    /// [`BookRecord::author`]
    Author,
    /// [`BookRecord::publisher`]
    Publisher,
    /// [`BookRecord::publish_date`]
    PublishDate,
    /// [`BookRecord::lccn`]
    Lccn,
    /// [`BookRecord::notes`]
    Notes,
}

impl Field {
    /// All editable fields in column order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Author,
        Self::Publisher,
        Self::PublishDate,
        Self::Lccn,
        Self::Notes,
    ];

    /// The column header used for this field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => HEADERS[1],
            Self::Author => HEADERS[2],
            Self::Publisher => HEADERS[3],
            Self::PublishDate => HEADERS[4],
            Self::Lccn => HEADERS[5],
            Self::Notes => HEADERS[6],
        }
    }
}

impl BookRecord {
    /// A record with every field empty apart from the `isbn`.
    ///
    /// This is what a lookup degrades to when the catalog has nothing for the ISBN.
    #[must_use]
    pub fn empty<S: Into<String>>(isbn: S) -> Self {
        Self {
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    /// The value of an editable field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Publisher => &self.publisher,
            Field::PublishDate => &self.publish_date,
            Field::Lccn => &self.lccn,
            Field::Notes => &self.notes,
        }
    }

    /// Sets the value of an editable field.
    pub fn set<S: Into<String>>(&mut self, field: Field, value: S) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Publisher => &mut self.publisher,
            Field::PublishDate => &mut self.publish_date,
            Field::Lccn => &mut self.lccn,
            Field::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// The seven column values in [`HEADERS`] order.
    #[must_use]
    pub fn columns(&self) -> [&str; 7] {
        [
            &self.isbn,
            &self.title,
            &self.author,
            &self.publisher,
            &self.publish_date,
            &self.lccn,
            &self.notes,
        ]
    }
}
