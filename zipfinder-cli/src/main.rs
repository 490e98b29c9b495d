//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use zipfinder_cli::CliError;

fn main() {
    match zipfinder_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("zipfinder: {err}");
            std::process::exit(1);
        }
    }
}
