//! One-way rendering of saved records as table rows.

use std::io::Write;

use crate::{
    record::{BookRecord, HEADERS},
    Error, ErrorKind,
};

/// Appends a visual row for each record it is given.
///
/// Rows are never updated or removed once rendered.
pub trait Renderer {
    /// Append a row for `record`.
    ///
    /// # Errors
    ///
    /// When the row cannot be written to the underlying output.
    fn render(&mut self, record: &BookRecord) -> Result<(), Error>;
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn render(&mut self, record: &BookRecord) -> Result<(), Error> {
        (**self).render(record)
    }
}

/// A [`Renderer`] writing `|` separated rows to any [`Write`], headed by the column names.
#[derive(Debug)]
pub struct TextTable<W: Write> {
    out: W,
    rows: usize,
}

impl<W: Write> TextTable<W> {
    /// A table that has not rendered anything yet.
    pub const fn new(out: W) -> Self {
        Self { out, rows: 0 }
    }

    /// Number of rows rendered so far, not counting the header.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Consumes the table and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, number: &str, cells: &[&str]) -> std::io::Result<()> {
        writeln!(self.out, "{number:>3} | {}", cells.join(" | "))
    }
}

impl<W: Write> Renderer for TextTable<W> {
    fn render(&mut self, record: &BookRecord) -> Result<(), Error> {
        let io = |e: std::io::Error| Error::wrap(ErrorKind::IO, e);

        if self.rows == 0 {
            self.write_line("#", &HEADERS).map_err(io)?;
        }
        self.rows += 1;
        let number = self.rows.to_string();
        self.write_line(&number, &record.columns()).map_err(io)?;
        self.out.flush().map_err(io)
    }
}
