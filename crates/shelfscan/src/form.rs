//! The form controller: ISBN entry, lookups, editing, saving and exporting.

use std::path::{Path, PathBuf};

use log::{debug, error, info, trace};

use crate::{
    catalog::Lookup,
    export::{self, SheetEncoder},
    interact::{Notice, Notifier, Prompter},
    isbn::Isbn,
    record::{BookRecord, Field},
    store::RecordStore,
    table::Renderer,
    Error,
};

/// Suggested name for an export.
pub const DEFAULT_EXPORT_NAME: &str = "scanned_books";

/// Whether the edit form is shown, and what it holds while it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    /// Nothing to edit; waiting for an ISBN.
    #[default]
    Hidden,
    /// A looked up record is being edited.
    Visible(BookRecord),
}

/// Which input has focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    /// The ISBN input.
    #[default]
    Isbn,
    /// The edit form.
    Form,
}

/// Everything a session holds, owned by a [`FormController`].
#[derive(Debug, Default)]
pub struct AppState {
    isbn_input: String,
    form: FormState,
    focus: Focus,
    store: RecordStore,
}

impl AppState {
    /// Current contents of the ISBN input.
    #[must_use]
    pub fn isbn_input(&self) -> &str {
        &self.isbn_input
    }

    /// The form state.
    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// The focused input.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// The saved records.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }
}

/// Mediates between the user and the catalog, the record store and the rendered table.
#[derive(Debug)]
pub struct FormController<L> {
    lookup: L,
    state: AppState,
}

impl<L: Lookup> FormController<L> {
    /// A controller with a hidden form and an empty store.
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            state: AppState::default(),
        }
    }

    /// The current session state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns `true` while the edit form is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state.form, FormState::Visible(_))
    }

    /// The record being edited, if the form is shown.
    #[must_use]
    pub const fn draft(&self) -> Option<&BookRecord> {
        match &self.state.form {
            FormState::Visible(draft) => Some(draft),
            FormState::Hidden => None,
        }
    }

    /// Replace the contents of the ISBN input.
    pub fn set_isbn_input<S: Into<String>>(&mut self, input: S) {
        self.state.isbn_input = input.into();
        self.state.focus = Focus::Isbn;
    }

    /// Looks up the ISBN input and shows the result in the form.
    ///
    /// Input that is not 10 to 13 digits is reported with [`Notice::MalformedIsbn`] and leaves the
    /// state untouched, returning `false`. Otherwise the form becomes visible with the resolved
    /// record, or an empty one if the lookup failed, and `true` is returned.
    pub fn lookup<N: Notifier + ?Sized>(&mut self, notifier: &mut N) -> bool {
        let isbn = match Isbn::parse(&self.state.isbn_input) {
            Ok(isbn) => isbn,
            Err(err) => {
                debug!("{err}");
                notifier.notify(Notice::MalformedIsbn);
                return false;
            }
        };

        let record = self.lookup.resolve(&isbn, notifier);
        trace!("Showing form for ISBN '{isbn}'");
        self.state.form = FormState::Visible(record);
        self.state.focus = Focus::Form;
        true
    }

    /// Set a field of the shown form. Does nothing while the form is hidden.
    pub fn edit<S: Into<String>>(&mut self, field: Field, value: S) {
        if let FormState::Visible(draft) = &mut self.state.form {
            draft.set(field, value);
        }
    }

    /// Commits the shown form as a new record.
    ///
    /// The trimmed ISBN input and trimmed field values are appended to the store and rendered,
    /// then the form is cleared and hidden and focus returns to the ISBN input. Any values,
    /// including all empty ones, are accepted. Returns `Ok(None)` when the form is hidden.
    ///
    /// # Errors
    ///
    /// When `renderer` fails to render the new row; the record is still saved.
    pub fn save<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Option<&BookRecord>, Error> {
        let draft = match std::mem::take(&mut self.state.form) {
            FormState::Visible(draft) => draft,
            FormState::Hidden => {
                trace!("Save ignored as the form is hidden");
                return Ok(None);
            }
        };

        let mut record = BookRecord::empty(self.state.isbn_input.trim());
        for field in Field::ALL {
            record.set(field, draft.get(field).trim());
        }

        self.state.isbn_input.clear();
        self.state.focus = Focus::Isbn;

        let record = self.state.store.append(record);
        info!("Saved '{}' ({})", record.title, record.isbn);
        renderer.render(record)?;
        Ok(Some(record))
    }

    /// Exports the store to `<dir>/<filename>.xlsx`, asking the user for the file name.
    ///
    /// An empty store is reported with [`Notice::NothingToExport`]; that and a cancelled or empty
    /// file name both return `None` without writing anything. A file name that is not plain, or a
    /// failure to encode or write the file, is reported with [`Notice::ExportFailed`] and also
    /// returns `None`. The store is never touched, so the export can simply be retried.
    pub fn export<N, P, E>(
        &self,
        notifier: &mut N,
        prompter: &mut P,
        encoder: &E,
        dir: &Path,
    ) -> Option<PathBuf>
    where
        N: Notifier + ?Sized,
        P: Prompter + ?Sized,
        E: SheetEncoder + ?Sized,
    {
        if self.state.store.is_empty() {
            notifier.notify(Notice::NothingToExport);
            return None;
        }

        let filename = match prompter.prompt(
            "Enter a file name for your export (without extension)",
            DEFAULT_EXPORT_NAME,
        ) {
            Some(name) if !name.is_empty() => name,
            _ => {
                info!("Export cancelled");
                return None;
            }
        };

        match export::write_export(self.state.store.all(), encoder, dir, &filename) {
            Ok(path) => Some(path),
            Err(err) => {
                error!("Export of {} records failed: {err}", self.state.store.len());
                notifier.notify(Notice::ExportFailed(err.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use assert_fs::{prelude::PathChild, TempDir};

    use super::{FormController, FormState, Focus};
    use crate::{
        catalog::Lookup,
        export::{Sheet, SheetEncoder, XlsxEncoder},
        interact::{Notice, RecordingNotifier, ScriptedPrompter},
        isbn::Isbn,
        record::{BookRecord, Field, HEADERS},
        table::{Renderer, TextTable},
        Error, ErrorKind,
    };

    /// Knows Animal Farm, misses everything else, fails for ISBNs starting with `9`.
    #[derive(Default)]
    struct StubLookup {
        calls: RefCell<Vec<String>>,
    }

    impl Lookup for StubLookup {
        fn lookup(&self, isbn: &Isbn) -> Result<BookRecord, Error> {
            self.calls.borrow_mut().push(isbn.to_string());
            match isbn.as_str() {
                "0451526538" => Ok(BookRecord {
                    title: "Animal Farm".to_owned(),
                    author: "George Orwell".to_owned(),
                    ..BookRecord::empty("0451526538")
                }),
                s if s.starts_with('9') => Err(Error::new(ErrorKind::IO, "connection refused")),
                _ => Err(Error::new(ErrorKind::NoValue, "No book found")),
            }
        }
    }

    /// Keeps the sheet it was asked to encode.
    #[derive(Default)]
    struct CapturingEncoder {
        sheet: RefCell<Option<Sheet>>,
    }

    impl SheetEncoder for CapturingEncoder {
        fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>, Error> {
            *self.sheet.borrow_mut() = Some(sheet.clone());
            Ok(b"PK".to_vec())
        }
    }

    /// Refuses every row, like a closed stdout.
    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&mut self, _: &BookRecord) -> Result<(), Error> {
            Err(Error::new(ErrorKind::IO, "broken pipe"))
        }
    }

    fn controller() -> FormController<StubLookup> {
        FormController::new(StubLookup::default())
    }

    #[test]
    fn malformed_isbn_does_not_look_up() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();

        for input in ["", "12345", "04515265X8", "97804515265331", "isbn"] {
            form.set_isbn_input(input);
            assert!(!form.lookup(&mut notifier), "{input}");
            assert_eq!(&FormState::Hidden, form.state().form());
        }

        assert!(form.state().store().is_empty());
        assert!(form.lookup.calls.borrow().is_empty());
        assert_eq!(vec![Notice::MalformedIsbn; 5], notifier.notices);
    }

    #[test]
    fn lookup_populates_and_shows_form() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();

        form.set_isbn_input(" 0451526538 ");
        assert!(form.lookup(&mut notifier));

        let draft = form.draft().expect("form should be visible");
        assert_eq!("Animal Farm", draft.title);
        assert_eq!("George Orwell", draft.author);
        assert_eq!(Focus::Form, form.state().focus());
        assert!(notifier.notices.is_empty());
    }

    #[test]
    fn miss_and_failure_still_open_an_empty_form() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();

        form.set_isbn_input("0000000000");
        assert!(form.lookup(&mut notifier));
        assert_eq!(Some(&BookRecord::empty("0000000000")), form.draft());

        form.set_isbn_input("9780140328721");
        assert!(form.lookup(&mut notifier));
        assert_eq!(Some(&BookRecord::empty("9780140328721")), form.draft());

        assert_eq!(vec![Notice::NotFound, Notice::NetworkError], notifier.notices);
    }

    #[test]
    fn save_commits_trimmed_record_and_resets_form() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);
        form.edit(Field::Notes, "  first edition \n");

        let saved = form.save(&mut table).unwrap().cloned();

        let expected = BookRecord {
            isbn: "0451526538".to_owned(),
            title: "Animal Farm".to_owned(),
            author: "George Orwell".to_owned(),
            notes: "first edition".to_owned(),
            ..BookRecord::default()
        };
        assert_eq!(Some(&expected), saved.as_ref());
        assert_eq!(&[expected], form.state().store().all());
        assert_eq!(1, table.rows());
        assert_eq!(&FormState::Hidden, form.state().form());
        assert_eq!("", form.state().isbn_input());
        assert_eq!(Focus::Isbn, form.state().focus());
    }

    #[test]
    fn animal_farm_is_first_row_everywhere() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);
        form.save(&mut table).unwrap();

        let expected = BookRecord {
            isbn: "0451526538".to_owned(),
            title: "Animal Farm".to_owned(),
            author: "George Orwell".to_owned(),
            ..BookRecord::default()
        };
        assert_eq!(&expected, &form.state().store().all()[0]);

        let out = String::from_utf8(table.into_inner()).unwrap();
        assert_eq!(
            Some("  1 | 0451526538 | Animal Farm | George Orwell |  |  |  | "),
            out.lines().nth(1)
        );

        let encoder = CapturingEncoder::default();
        let mut prompter = ScriptedPrompter::answering([Some("books")]);
        form.export(&mut notifier, &mut prompter, &encoder, dir.path());

        let sheet = encoder.sheet.borrow().clone().unwrap();
        assert_eq!(expected.columns().to_vec(), sheet.rows()[1]);
    }

    #[test]
    fn all_empty_fields_can_be_saved() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());

        form.set_isbn_input("0000000000");
        form.lookup(&mut notifier);
        assert!(form.save(&mut table).unwrap().is_some());

        assert_eq!(&[BookRecord::empty("0000000000")], form.state().store().all());
    }

    #[test]
    fn save_while_hidden_does_nothing() {
        let mut form = controller();
        let mut table = TextTable::new(Vec::new());

        form.set_isbn_input("0451526538");
        assert!(form.save(&mut table).unwrap().is_none());
        form.edit(Field::Title, "ignored");

        assert!(form.state().store().is_empty());
        assert_eq!(0, table.rows());
        assert_eq!("0451526538", form.state().isbn_input());
    }

    #[test]
    fn export_with_empty_store_notifies_and_writes_nothing() {
        let form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut prompter = ScriptedPrompter::answering([Some("books")]);
        let encoder = CapturingEncoder::default();
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        let res = form.export(&mut notifier, &mut prompter, &encoder, dir.path());

        assert_eq!(None, res);
        assert_eq!(vec![Notice::NothingToExport], notifier.notices);
        assert!(prompter.asked.is_empty());
        assert!(encoder.sheet.borrow().is_none());
        assert_eq!(0, std::fs::read_dir(dir.path()).unwrap().count());
    }

    #[test]
    fn cancelled_or_empty_filename_aborts_export() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());
        let encoder = CapturingEncoder::default();
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);
        form.save(&mut table).unwrap();

        let mut prompter = ScriptedPrompter::answering([None, Some("")]);
        for _ in 0..2 {
            let res = form.export(&mut notifier, &mut prompter, &encoder, dir.path());
            assert_eq!(None, res);
        }

        assert!(encoder.sheet.borrow().is_none());
        assert_eq!(0, std::fs::read_dir(dir.path()).unwrap().count());
    }

    #[test]
    fn export_writes_n_plus_one_rows() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());
        let encoder = CapturingEncoder::default();
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        for isbn in ["0451526538", "0000000000", "0451526538"] {
            form.set_isbn_input(isbn);
            form.lookup(&mut notifier);
            form.save(&mut table).unwrap();
        }

        let mut prompter = ScriptedPrompter::answering([Some("my shelf")]);
        let path = form
            .export(&mut notifier, &mut prompter, &encoder, dir.path())
            .expect("export should produce a file");

        assert_eq!(dir.path().join("my shelf.xlsx"), path);
        assert!(path.is_file());

        let sheet = encoder.sheet.borrow().clone().unwrap();
        assert_eq!("Books", sheet.name());
        assert_eq!(4, sheet.rows().len());
        assert!(sheet.rows().iter().all(|row| row.len() == 7));
        assert_eq!(HEADERS.to_vec(), sheet.rows()[0]);
    }

    #[test]
    fn failed_write_keeps_store_and_can_be_retried() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let not_a_dir = dir.child("taken");
        std::fs::write(not_a_dir.path(), "a file, not a directory").unwrap();

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);
        form.save(&mut table).unwrap();

        let mut prompter = ScriptedPrompter::answering([Some("books"), Some("books")]);
        let res = form.export(&mut notifier, &mut prompter, &XlsxEncoder, not_a_dir.path());

        assert_eq!(None, res);
        assert!(matches!(
            notifier.notices.as_slice(),
            [Notice::ExportFailed(reason)] if reason.starts_with("IO error")
        ));
        assert_eq!(1, form.state().store().len());

        let retry = dir.child("exports");
        let path = form
            .export(&mut notifier, &mut prompter, &XlsxEncoder, retry.path())
            .expect("retry into a fresh directory should succeed");
        assert_eq!(retry.child("books.xlsx").path(), path);
        assert!(path.is_file());
    }

    #[test]
    fn filename_with_path_separators_is_refused() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();
        let mut table = TextTable::new(Vec::new());
        let encoder = CapturingEncoder::default();
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("out");

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);
        form.save(&mut table).unwrap();

        let mut prompter = ScriptedPrompter::answering([Some("../escape"), Some("/tmp/abs")]);
        for _ in 0..2 {
            assert_eq!(
                None,
                form.export(&mut notifier, &mut prompter, &encoder, out.path())
            );
        }

        assert_eq!(2, notifier.notices.len());
        assert!(notifier
            .notices
            .iter()
            .all(|n| matches!(n, Notice::ExportFailed(_))));
        assert!(encoder.sheet.borrow().is_none());
        assert_eq!(0, std::fs::read_dir(dir.path()).unwrap().count());
        assert_eq!(1, form.state().store().len());
    }

    #[test]
    fn render_failure_still_saves_and_resets() {
        let mut form = controller();
        let mut notifier = RecordingNotifier::default();

        form.set_isbn_input("0451526538");
        form.lookup(&mut notifier);

        let err = form.save(&mut FailingRenderer).unwrap_err();

        assert_eq!(ErrorKind::IO, err.kind());
        assert_eq!(1, form.state().store().len());
        assert_eq!(&FormState::Hidden, form.state().form());
        assert_eq!(Focus::Isbn, form.state().focus());
    }
}
