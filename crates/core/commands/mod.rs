use std::path::PathBuf;

use crate::app;

use shelfscan::{
    catalog::{Catalog, CatalogKind},
    form::FormController,
    record::{BookRecord, HEADERS},
};

use clap::Subcommand;
use log::trace;

/// Options shared by every command.
#[derive(Debug)]
pub struct Settings {
    pub catalog: CatalogKind,
    pub catalog_url: Option<String>,
    pub out_dir: PathBuf,
}

impl Settings {
    fn catalog(&self) -> Catalog {
        Catalog::new(self.catalog, self.catalog_url.clone())
    }
}

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Scan ISBNs one after another, editing and saving each book, then export the list
    ///
    /// Saved books only live for the session so export them before quitting.
    Scan,

    /// Look up a single ISBN and print what the catalog knows about it
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The 10 or 13 digit ISBN to look up
        isbn: String,
    },
}

impl Commands {
    pub fn execute(self, settings: &Settings) -> Result<String, Box<dyn std::error::Error>> {
        match self {
            Commands::Scan => {
                trace!("Starting a scan session");
                let mut form = FormController::new(settings.catalog());
                app::run_session(&mut form, &settings.out_dir)?;
                Ok(String::new())
            }
            Commands::Lookup { isbn } => {
                let record =
                    shelfscan::book_by_isbn(&isbn, settings.catalog, settings.catalog_url.clone())?;
                Ok(describe(&record))
            }
        }
    }
}

fn describe(record: &BookRecord) -> String {
    let width = HEADERS.iter().map(|h| h.len()).max().unwrap_or(0);
    HEADERS
        .iter()
        .zip(record.columns())
        .map(|(header, value)| format!("{header:>width$}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn describe_lists_every_column() {
    let record = BookRecord {
        title: "Animal Farm".to_owned(),
        author: "George Orwell".to_owned(),
        ..BookRecord::empty("0451526538")
    };

    let text = describe(&record);
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(7, lines.len());
    assert_eq!("            ISBN: 0451526538", lines[0]);
    assert_eq!("          Author: George Orwell", lines[2]);
    assert_eq!("           Notes: ", lines[6]);
}
