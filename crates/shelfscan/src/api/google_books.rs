use log::{info, trace};
use serde::Deserialize;

use crate::{isbn::Isbn, record::BookRecord, Error, ErrorKind};

use super::{null_as_default, Client};

pub(crate) const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com";

pub(crate) fn get_book_by_isbn<C: Client>(
    client: &C,
    base_url: &str,
    isbn: &Isbn,
) -> Result<BookRecord, Error> {
    info!("Searching for ISBN '{isbn}' using Google Books API");
    let url = format!(
        "{}/books/v1/volumes?q=isbn:{isbn}",
        base_url.trim_end_matches('/')
    );

    let GoogleModel { items } = client.get_json(&url)?;

    trace!("Request was successful");

    let item = items
        .into_iter()
        .next()
        .ok_or_else(|| Error::new(ErrorKind::NoValue, "No books found!"))?;

    Ok(item.build(isbn.as_str().to_owned()))
}

// `items` is left out entirely when nothing matches.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<Item>,
}

/// The API does not include the ISBN.. so this struct also acts as
/// a builder for the [`BookRecord`], see [`Item::build`].
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo", default, deserialize_with = "null_as_default")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct VolumeInfo {
    #[serde(deserialize_with = "null_as_default")]
    authors: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    publisher: String,
    #[serde(rename = "publishedDate", deserialize_with = "null_as_default")]
    published_date: String,
}

impl Item {
    fn build(self, isbn: String) -> BookRecord {
        // Deconstruct to take ownership of fields (avoids cloning).
        let VolumeInfo {
            mut authors,
            title,
            publisher,
            published_date,
        } = self.volume_info;

        authors.retain(|author| !author.is_empty());

        // Google Books has no LCCN so that is left for the user.
        BookRecord {
            isbn,
            title,
            author: authors.join(", "),
            publisher,
            publish_date: published_date,
            ..BookRecord::default()
        }
    }
}
