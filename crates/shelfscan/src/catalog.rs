//! Resolving an [`Isbn`] to a [`BookRecord`] using a remote catalog.

use log::{error, info};

use crate::{
    api::{self, Client},
    interact::{Notice, Notifier},
    isbn::Isbn,
    record::BookRecord,
    Error, ErrorKind,
};

/// The catalog services that can be searched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogKind {
    /// The Open Library books API.
    #[default]
    OpenLibrary,
    /// The Google Books volumes API, which has no LCCN data.
    GoogleBooks,
}

impl CatalogKind {
    /// The base URL of the public service.
    #[must_use]
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::OpenLibrary => api::open_library::OPEN_LIBRARY_URL,
            Self::GoogleBooks => api::google_books::GOOGLE_BOOKS_URL,
        }
    }

    /// Display name of the service.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenLibrary => "Open Library",
            Self::GoogleBooks => "Google Books",
        }
    }
}

/// Something that can look up the catalog data for an ISBN.
pub trait Lookup {
    /// Looks up `isbn`, failing when there is no match or the request fails.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NoValue`] when nothing is found, [`ErrorKind::IO`] or
    /// [`ErrorKind::Deserialize`] when the request or response is broken.
    fn lookup(&self, isbn: &Isbn) -> Result<BookRecord, Error>;

    /// Looks up `isbn`, degrading every failure to an empty record after notifying the user.
    ///
    /// A miss is reported as [`Notice::NotFound`], anything else as [`Notice::NetworkError`] and
    /// is also logged. The returned record always carries `isbn`.
    fn resolve<N: Notifier + ?Sized>(&self, isbn: &Isbn, notifier: &mut N) -> BookRecord {
        match self.lookup(isbn) {
            Ok(record) => record,
            Err(err) if err.kind() == ErrorKind::NoValue => {
                info!("{err}");
                notifier.notify(Notice::NotFound);
                BookRecord::empty(isbn.as_str())
            }
            Err(err) => {
                error!("Error fetching book data: {err}");
                notifier.notify(Notice::NetworkError);
                BookRecord::empty(isbn.as_str())
            }
        }
    }
}

/// A [`Lookup`] against one of the [`CatalogKind`] services.
#[derive(Debug)]
pub struct Catalog<C = reqwest::blocking::Client> {
    client: C,
    kind: CatalogKind,
    base_url: String,
}

impl Catalog {
    /// A catalog of `kind` using a default HTTP client, optionally pointed at a different
    /// `base_url` than the public service.
    #[must_use]
    pub fn new(kind: CatalogKind, base_url: Option<String>) -> Self {
        Self::with_client(reqwest::blocking::Client::new(), kind, base_url)
    }
}

impl<C: Client> Catalog<C> {
    /// A catalog of `kind` using `client`, optionally pointed at a different `base_url`.
    pub fn with_client(client: C, kind: CatalogKind, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| kind.default_url().to_owned());
        Self {
            client,
            kind,
            base_url,
        }
    }

    /// The base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl<C: Client> Lookup for Catalog<C> {
    fn lookup(&self, isbn: &Isbn) -> Result<BookRecord, Error> {
        match self.kind {
            CatalogKind::OpenLibrary => {
                api::open_library::get_book_by_isbn(&self.client, &self.base_url, isbn)
            }
            CatalogKind::GoogleBooks => {
                api::google_books::get_book_by_isbn(&self.client, &self.base_url, isbn)
            }
        }
    }
}
