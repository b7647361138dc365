//! Turning saved records into a spreadsheet file.
//!
//! The grid and its column widths are built here; the binary encoding is left to a
//! [`SheetEncoder`] so the spreadsheet library can be swapped out.

use std::path::{Component, Path, PathBuf};

use log::{info, trace};
use rust_xlsxwriter::Workbook;

use crate::{
    record::{BookRecord, HEADERS},
    Error, ErrorKind,
};

/// Name of the single worksheet in an export.
pub const SHEET_NAME: &str = "Books";

/// File extension of exported workbooks.
pub const EXTENSION: &str = "xlsx";

/// Padding added to the widest cell of each column.
const WIDTH_PADDING: usize = 2;

/// A named grid of text cells along with a width hint for each column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Sheet {
    /// The header row followed by one row per record, in store order.
    #[must_use]
    pub fn from_records(records: &[BookRecord]) -> Self {
        let rows: Vec<Vec<String>> = std::iter::once(HEADERS.map(ToOwned::to_owned).to_vec())
            .chain(
                records
                    .iter()
                    .map(|r| r.columns().map(ToOwned::to_owned).to_vec()),
            )
            .collect();
        let widths = column_widths(&rows);

        Self {
            name: SHEET_NAME.to_owned(),
            rows,
            widths,
        }
    }

    /// The worksheet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every row, headers first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Width hint per column, in characters.
    #[must_use]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }
}

/// Width of each column: the character count of its longest cell plus two.
///
/// The first row decides how many columns there are.
#[must_use]
pub fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let columns = rows.first().map_or(0, Vec::len);
    (0..columns)
        .map(|i| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
                + WIDTH_PADDING
        })
        .collect()
}

/// Encodes a [`Sheet`] into the bytes of a spreadsheet file.
pub trait SheetEncoder {
    /// Encode `sheet` as a single sheet workbook.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Encode`] error when the encoder rejects the sheet.
    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>, Error>;
}

impl<T: SheetEncoder + ?Sized> SheetEncoder for &T {
    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>, Error> {
        (**self).encode(sheet)
    }
}

/// A [`SheetEncoder`] producing Office Open XML workbooks (`.xlsx`).
#[derive(Copy, Clone, Debug, Default)]
pub struct XlsxEncoder;

impl SheetEncoder for XlsxEncoder {
    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>, Error> {
        let encode = |e: rust_xlsxwriter::XlsxError| Error::wrap(ErrorKind::Encode, e);
        let out_of_range = |what: &str| {
            Error::new(
                ErrorKind::Encode,
                format!("Too many {what} for a worksheet"),
            )
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name()).map_err(encode)?;

        for (r, row) in sheet.rows().iter().enumerate() {
            let r = u32::try_from(r).map_err(|_| out_of_range("rows"))?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).map_err(|_| out_of_range("columns"))?;
                worksheet.write_string(r, c, cell.as_str()).map_err(encode)?;
            }
        }

        for (c, width) in sheet.widths().iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| out_of_range("columns"))?;
            let width = u32::try_from(*width).map_err(|_| out_of_range("characters"))?;
            worksheet
                .set_column_width(c, f64::from(width))
                .map_err(encode)?;
        }

        trace!("Encoding {} rows into a workbook", sheet.rows().len());
        workbook.save_to_buffer().map_err(encode)
    }
}

/// The path an export named `filename` is written to inside `dir`.
///
/// # Errors
///
/// An [`ErrorKind::Validation`] error when `filename` is not a plain file name, e.g. it holds a
/// path separator or is `..`, as the export would then land outside `dir`.
pub fn export_path(dir: &Path, filename: &str) -> Result<PathBuf, Error> {
    let mut components = Path::new(filename).components();
    let plain = !filename.contains(|c: char| c == '/' || c == '\\')
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();

    if !plain {
        return Err(Error::new(
            ErrorKind::Validation,
            format!("'{filename}' is not a plain file name"),
        ));
    }

    Ok(dir.join(format!("{filename}.{EXTENSION}")))
}

/// Encodes `records` with `encoder` and writes the result to `<dir>/<filename>.xlsx`.
///
/// `dir` is created first if it does not exist yet.
///
/// # Errors
///
/// When `filename` is rejected by [`export_path`], encoding fails or the file cannot be written.
pub fn write_export<E: SheetEncoder + ?Sized>(
    records: &[BookRecord],
    encoder: &E,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, Error> {
    let path = export_path(dir, filename)?;
    let sheet = Sheet::from_records(records);
    let bytes = encoder.encode(&sheet)?;

    std::fs::create_dir_all(dir).map_err(|e| Error::wrap(ErrorKind::IO, e))?;
    std::fs::write(&path, bytes).map_err(|e| Error::wrap(ErrorKind::IO, e))?;
    info!("Exported {} records to '{}'", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Cursor, Read},
        path::Path,
    };

    use assert_fs::{prelude::PathChild, TempDir};

    use super::{column_widths, export_path, write_export, Sheet, SheetEncoder, XlsxEncoder};
    use crate::{
        record::{BookRecord, HEADERS},
        ErrorKind,
    };

    /// Reads one part of the workbook's zip container as text.
    fn workbook_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("workbook is a zip");
        let mut part = archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("workbook has no '{name}'"));
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn animal_farm() -> BookRecord {
        BookRecord {
            title: "Animal Farm".to_owned(),
            author: "George Orwell".to_owned(),
            ..BookRecord::empty("0451526538")
        }
    }

    #[test]
    fn sheet_has_header_row_then_records() {
        let sheet = Sheet::from_records(&[animal_farm(), BookRecord::empty("9780140328721")]);

        assert_eq!("Books", sheet.name());
        assert_eq!(3, sheet.rows().len());
        assert!(sheet.rows().iter().all(|row| row.len() == 7));
        assert_eq!(HEADERS.to_vec(), sheet.rows()[0]);
        assert_eq!(
            vec!["0451526538", "Animal Farm", "George Orwell", "", "", "", ""],
            sheet.rows()[1]
        );
    }

    #[test]
    fn widths_are_longest_cell_plus_two() {
        let sheet = Sheet::from_records(&[animal_farm()]);

        // ISBN, Title, Author, Publisher, Publication Date, LCCN, Notes
        assert_eq!(&[12, 13, 15, 11, 18, 6, 7], sheet.widths());
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let rows = vec![
            vec!["A".to_owned()],
            vec!["Café Müller".to_owned()],
        ];
        assert_eq!(vec![13], column_widths(&rows));
        assert!(column_widths(&[]).is_empty());
    }

    #[test]
    fn xlsx_encoder_produces_zip_container() {
        let bytes = XlsxEncoder
            .encode(&Sheet::from_records(&[animal_farm()]))
            .unwrap();

        assert_eq!(b"PK", &bytes[..2]);
    }

    #[test]
    fn xlsx_workbook_holds_books_sheet_with_headers_rows_and_widths() {
        let records = [animal_farm(), BookRecord::empty("9780140328721")];
        let bytes = XlsxEncoder.encode(&Sheet::from_records(&records)).unwrap();

        let workbook = workbook_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Books""#), "{workbook}");

        let worksheet = workbook_part(&bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(records.len() + 1, worksheet.matches("<row ").count());
        assert_eq!(7, worksheet.matches("<col ").count());
        // Excel stores character widths with a fixed padding of 0.7 on top.
        for width in [12, 13, 15, 11, 18, 6, 7] {
            assert!(
                worksheet.contains(&format!(r#"width="{width}.7"#)),
                "missing width {width} in {worksheet}"
            );
        }

        let strings = workbook_part(&bytes, "xl/sharedStrings.xml");
        for header in HEADERS {
            assert!(strings.contains(&format!("<t>{header}</t>")), "{strings}");
        }
        assert!(strings.contains("<t>Animal Farm</t>"));
    }

    #[test]
    fn export_path_appends_extension() {
        assert_eq!(
            Path::new("out/scanned_books.xlsx"),
            export_path(Path::new("out"), "scanned_books").unwrap()
        );
        assert_eq!(
            Path::new("out/my shelf.v2.xlsx"),
            export_path(Path::new("out"), "my shelf.v2").unwrap()
        );
    }

    #[test]
    fn export_path_rejects_names_leaving_the_directory() {
        for name in ["../escape", "/tmp/abs", "nested/books", "..", ".", "a\\b", ""] {
            let err = export_path(Path::new("out"), name).unwrap_err();
            assert_eq!(ErrorKind::Validation, err.kind(), "{name}");
        }
    }

    #[test]
    fn write_export_creates_missing_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("exports").child("2024");

        let path = write_export(&[animal_farm()], &XlsxEncoder, out.path(), "shelf").unwrap();

        assert_eq!(out.child("shelf.xlsx").path(), path);
        assert!(path.is_file());
    }

    #[test]
    fn write_export_to_a_file_instead_of_directory_is_io_error() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let not_a_dir = dir.child("books.txt");
        std::fs::write(not_a_dir.path(), "taken").unwrap();

        let err = write_export(&[animal_farm()], &XlsxEncoder, not_a_dir.path(), "shelf")
            .unwrap_err();

        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn write_export_creates_file() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        let path = write_export(&[animal_farm()], &XlsxEncoder, dir.path(), "shelf").unwrap();

        assert_eq!(dir.child("shelf.xlsx").path(), path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
