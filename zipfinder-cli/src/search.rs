//! Search command implementation for the zipfinder CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use zipfinder_core::{AddressLookup, DEFAULT_SEARCH_LIMIT, SearchField, SearchResult};
use zipfinder_data::ZipcodeFinder;

use crate::{ARG_BY, ARG_DATABASE, ARG_LIMIT, ARG_QUERY, CliError, ENV_DATABASE, ENV_QUERY};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search an imported database for a case-insensitive \
                 substring of the zipcode, locality, street or postal \
                 designation.",
    about = "Search an imported database"
)]
#[ortho_config(prefix = "ZIPFINDER")]
pub(crate) struct SearchArgs {
    /// Text to look for.
    #[arg(value_name = ARG_QUERY)]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to the SQLite database produced by `import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Which columns to match: code, locality, street or all.
    #[arg(long = ARG_BY, value_name = "field")]
    #[serde(default)]
    pub(crate) by: Option<String>,
    /// Maximum number of results.
    #[arg(long = ARG_LIMIT, value_name = "rows")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Print results as a JSON array.
    #[arg(long)]
    #[serde(default)]
    pub(crate) json: bool,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) database: Utf8PathBuf,
    pub(crate) field: SearchField,
    pub(crate) limit: usize,
    pub(crate) json: bool,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_QUERY,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        let field = match args.by {
            Some(raw) => raw.parse()?,
            None => SearchField::default(),
        };
        Ok(Self {
            query,
            database,
            field,
            limit: args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            json: args.json,
        })
    }
}

/// Run a search and print the results to `out`.
pub(crate) fn run_search<W: Write>(args: SearchArgs, mut out: W) -> Result<(), CliError> {
    let config = args.into_config()?;
    let finder = ZipcodeFinder::open(&config.database)?;
    let results = finder.search(config.field, &config.query, config.limit)?;
    if config.json {
        serde_json::to_writer_pretty(&mut out, &results).map_err(CliError::SerializeResults)?;
        writeln!(out).map_err(CliError::WriteOutput)?;
    } else {
        for result in &results {
            writeln!(out, "{}", render(result)).map_err(CliError::WriteOutput)?;
        }
    }
    out.flush().map_err(CliError::WriteOutput)
}

/// One line per result: code, designation, street, then the owning places.
pub(crate) fn render(result: &SearchResult) -> String {
    let zipcode = &result.zipcode;
    format!(
        "{}  {}  {}  {}, {}, {}",
        zipcode.full_zipcode(),
        zipcode.postal_designation,
        zipcode.street_line().unwrap_or_default(),
        zipcode.locality_name,
        result.municipality_name(),
        result.district_name(),
    )
}
