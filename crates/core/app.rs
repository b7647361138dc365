use std::{io, path::Path};

use log::{error, info, trace};
use shelfscan::{
    catalog::Lookup,
    export::XlsxEncoder,
    form::FormController,
    record::Field,
    table::TextTable,
};

use crate::interact::{
    user_confirm, user_edit, user_input, user_select, TerminalNotifier, TerminalPrompter,
};

const ACTIONS: [&str; 3] = ["Scan an ISBN", "Export to spreadsheet", "Quit"];

/// An entry of the "What next?" menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Scan,
    Export,
    Quit,
}

impl Action {
    /// Backing out of the menu counts as asking to quit.
    const fn from_selection(selection: Option<usize>) -> Self {
        match selection {
            Some(0) => Self::Scan,
            Some(1) => Self::Export,
            _ => Self::Quit,
        }
    }
}

/// Runs the scan menu until the user quits.
pub fn run_session<L: Lookup>(form: &mut FormController<L>, out_dir: &Path) -> eyre::Result<()> {
    let mut table = TextTable::new(io::stdout());
    let mut notifier = TerminalNotifier;

    loop {
        match Action::from_selection(user_select("What next?", &ACTIONS)?) {
            Action::Scan => scan(form, &mut table, &mut notifier)?,
            Action::Export => {
                let exported =
                    form.export(&mut notifier, &mut TerminalPrompter, &XlsxEncoder, out_dir);
                if let Some(path) = exported {
                    println!("Saved {}", path.display());
                }
            }
            Action::Quit => {
                if confirm_quit(form)? {
                    return Ok(());
                }
            }
        }
    }
}

fn scan<L: Lookup>(
    form: &mut FormController<L>,
    table: &mut TextTable<io::Stdout>,
    notifier: &mut TerminalNotifier,
) -> eyre::Result<()> {
    form.set_isbn_input(user_input("ISBN")?);
    if !form.lookup(notifier) {
        return Ok(());
    }

    // The form stays open until the user is happy to save it.
    loop {
        for field in Field::ALL {
            let current = form
                .draft()
                .map(|draft| draft.get(field).to_owned())
                .unwrap_or_default();
            let value = user_edit(field.label(), &current)?;
            form.edit(field, value);
        }

        if user_confirm("Save this book?", true)? {
            break;
        }
        trace!("Editing the form again");
    }

    // The record is in the store even when the table could not show it.
    match form.save(table) {
        Ok(Some(record)) => trace!("Saved record for ISBN '{}'", record.isbn),
        Ok(None) => {}
        Err(err) => {
            error!("Could not add the saved book to the table: {err}");
            println!("Book saved, but it could not be shown: {err}");
        }
    }
    info!("{} books saved this session", form.state().store().len());
    Ok(())
}

fn confirm_quit<L: Lookup>(form: &FormController<L>) -> eyre::Result<bool> {
    let saved = form.state().store().len();
    if saved == 0 {
        return Ok(true);
    }
    user_confirm(
        &format!("{saved} saved books will be lost unless exported. Quit anyway?"),
        false,
    )
}
