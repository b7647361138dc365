#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, path::PathBuf, process};

mod app;
mod commands;
mod interact;

use commands::Commands;

use shelfscan::catalog::CatalogKind;

use clap::{ArgEnum, Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<(), Box<dyn error::Error>> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                catalog,
                catalog_url,
                out_dir,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let settings = commands::Settings {
        catalog: catalog.into(),
        catalog_url,
        out_dir,
    };
    trace!("Using the {} catalog", settings.catalog.name());

    let message = command.unwrap_or(Commands::Scan).execute(&settings)?;
    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "shelfscan")]
#[clap(
    about = "Look up books by ISBN, review the details and export your list to a spreadsheet"
)]
#[clap(version, author)]
struct Cli {
    /// Defaults to `scan` when no command is given
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// The catalog service used to look up ISBNs
    #[clap(long, arg_enum, default_value = "open-library", global = true)]
    catalog: CatalogArg,

    /// Send catalog requests to this base URL instead of the public service
    #[clap(long, global = true)]
    catalog_url: Option<String>,

    /// Directory exported spreadsheets are written to
    #[clap(short, long, parse(from_os_str), default_value = ".", global = true)]
    out_dir: PathBuf,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Only errors are logged, regardless of verbosity.
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CatalogArg {
    OpenLibrary,
    GoogleBooks,
}

impl From<CatalogArg> for CatalogKind {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::OpenLibrary => Self::OpenLibrary,
            CatalogArg::GoogleBooks => Self::GoogleBooks,
        }
    }
}
