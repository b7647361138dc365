#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # shelfscan
//!
//! shelfscan looks up book metadata by ISBN from a remote catalog, lets the user review and edit
//! the result in a [`form::FormController`], collects the saved [`record::BookRecord`]s in an
//! in-memory [`store::RecordStore`] and exports them to an `.xlsx` spreadsheet.
//!
//! Talking to the user is left to the front end through the [`interact::Notifier`],
//! [`interact::Prompter`] and [`table::Renderer`] traits.

mod api;
pub mod catalog;
mod error;
pub mod export;
pub mod form;
pub mod interact;
pub mod isbn;
pub mod record;
pub mod store;
pub mod table;

pub use api::Client;
pub use error::{Error, ErrorKind};

use catalog::{Catalog, CatalogKind, Lookup};
use log::trace;

/// Look up `isbn` in the `kind` catalog, at its public URL unless `base_url` is given.
///
/// Unlike [`Lookup::resolve`] this does not degrade failures to an empty record.
///
/// # Errors
///
/// A [`ErrorKind::Validation`] error when `isbn` is not 10 to 13 digits.
/// A [`ErrorKind::NoValue`] error when the catalog has no entry for `isbn`.
/// An `Err` is returned when the request fails or the response cannot be parsed.
pub fn book_by_isbn(
    isbn: &str,
    kind: CatalogKind,
    base_url: Option<String>,
) -> Result<record::BookRecord, Error> {
    trace!("Search {} for ISBN of '{isbn}'", kind.name());
    let isbn = isbn::Isbn::parse(isbn)?;
    Catalog::new(kind, base_url).lookup(&isbn)
}
