//! Command-line interface for importing and searching postal reference data.
#![forbid(unsafe_code)]

use std::io::{self, Write};

use clap::{Parser, Subcommand};

mod console;
mod error;
mod import;
mod search;

pub use error::CliError;

use import::{ImportArgs, run_import};
use search::{SearchArgs, run_search};

const ARG_SOURCE: &str = "source";
const ARG_DATABASE_DIR: &str = "database-dir";
const ARG_DATABASE_NAME: &str = "database-name";
const ARG_BATCH_SIZE: &str = "batch-size";
const ARG_DATABASE: &str = "database";
const ARG_BY: &str = "by";
const ARG_LIMIT: &str = "limit";
const ARG_QUERY: &str = "query";
const ENV_SOURCE: &str = "ZIPFINDER_CMDS_IMPORT_SOURCE";
const ENV_DATABASE_DIR: &str = "ZIPFINDER_CMDS_IMPORT_DATABASE_DIR";
const ENV_DATABASE: &str = "ZIPFINDER_CMDS_SEARCH_DATABASE";
const ENV_QUERY: &str = "ZIPFINDER_CMDS_SEARCH_QUERY";

/// Run the zipfinder CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let stdout = io::stdout();
    dispatch(cli.command, stdout.lock())
}

fn dispatch(command: Command, out: impl Write) -> Result<(), CliError> {
    match command {
        Command::Import(args) => run_import(args, out).map(drop),
        Command::Search(args) => run_search(args, out),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "zipfinder",
    about = "Import and search postal reference data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import districts, municipalities and zipcodes into a new SQLite database.
    Import(ImportArgs),
    /// Search an imported database.
    Search(SearchArgs),
}

#[cfg(test)]
mod tests;
