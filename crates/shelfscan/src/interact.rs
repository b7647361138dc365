//! Capabilities the [`FormController`](crate::form::FormController) uses to talk to the user.
//!
//! Front ends implement [`Notifier`] and [`Prompter`]; tests use recording doubles.

use std::fmt;

/// A blocking, user facing notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The ISBN input failed the 10 to 13 digit check.
    MalformedIsbn,
    /// The catalog has no entry for the ISBN.
    NotFound,
    /// The lookup failed in transport or while parsing the response.
    NetworkError,
    /// Export was requested while the record store was empty.
    NothingToExport,
    /// The export file could not be written; the saved records are kept.
    ExportFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedIsbn => f.write_str("Please enter a 10- or 13-digit ISBN."),
            Self::NotFound => f.write_str("Book not found. You may enter data manually."),
            Self::NetworkError => f.write_str("Network error during lookup."),
            Self::NothingToExport => f.write_str("No books to export."),
            Self::ExportFailed(reason) => write!(f, "Export failed: {reason}"),
        }
    }
}

/// Shows a [`Notice`] to the user and waits for them to acknowledge it.
pub trait Notifier {
    /// Show `notice` to the user.
    fn notify(&mut self, notice: Notice);
}

/// Asks the user for a line of text.
pub trait Prompter {
    /// Prompt the user with `message`, suggesting `default`.
    ///
    /// `None` means the user cancelled the prompt.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }
}

impl<T: Prompter + ?Sized> Prompter for &mut T {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        (**self).prompt(message, default)
    }
}

#[cfg(test)]
pub(crate) use test::{RecordingNotifier, ScriptedPrompter};
