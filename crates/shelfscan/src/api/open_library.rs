use std::collections::HashMap;

use log::{info, trace};
use serde::Deserialize;

use crate::{isbn::Isbn, record::BookRecord, Error, ErrorKind};

use super::{null_as_default, Client};

pub(crate) const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";

pub(crate) fn get_book_by_isbn<C: Client>(
    client: &C,
    base_url: &str,
    isbn: &Isbn,
) -> Result<BookRecord, Error> {
    info!("Searching for ISBN '{isbn}' using the Open Library API");
    let url = format!(
        "{}/api/books?bibkeys=ISBN:{isbn}&format=json&jscmd=data",
        base_url.trim_end_matches('/')
    );

    let mut model: HashMap<String, BookData> = client.get_json(&url)?;

    trace!("Request was successful");

    let data = model.remove(&format!("ISBN:{isbn}")).ok_or_else(|| {
        Error::new(
            ErrorKind::NoValue,
            format!("No book found for ISBN '{isbn}'"),
        )
    })?;

    Ok(data.build(isbn.as_str().to_owned()))
}

/// The `jscmd=data` view of a single book.
///
/// Any of these can be missing or `null` in the response, which just leaves the field empty.
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct BookData {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    authors: Vec<Named>,
    #[serde(deserialize_with = "null_as_default")]
    publishers: Vec<Named>,
    #[serde(deserialize_with = "null_as_default")]
    publish_date: String,
    #[serde(deserialize_with = "null_as_default")]
    identifiers: Identifiers,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct Named {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct Identifiers {
    #[serde(deserialize_with = "null_as_default")]
    lccn: Vec<String>,
}

fn join_names(named: Vec<Named>) -> String {
    named
        .into_iter()
        .map(|n| n.name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BookData {
    // The response is keyed by ISBN rather than carrying it, so it is passed back in here.
    fn build(self, isbn: String) -> BookRecord {
        let Self {
            title,
            authors,
            publishers,
            publish_date,
            identifiers: Identifiers { lccn },
        } = self;

        BookRecord {
            isbn,
            title,
            author: join_names(authors),
            publisher: join_names(publishers),
            publish_date,
            lccn: lccn.join(", "),
            notes: String::new(),
        }
    }
}
