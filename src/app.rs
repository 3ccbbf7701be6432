// Declare modules
pub mod cli;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod lister;
pub mod metadata;
pub mod models;
pub mod request;
pub mod scanner;

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use self::cli::{Cli, Command, LsArgs};
use self::config::{load_config_file, resolve_request, terminal_width};
use self::errors::ListError;
use self::models::Listing;

/// Parses the command line and dispatches to the matching command.
pub fn run() -> Result<ExitCode> {
    let args = Cli::parse();

    match args.command {
        Command::Ls(ls) => run_ls(ls, args.config.as_deref()),
    }
}

fn run_ls(args: LsArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    // 1. Resolve configuration; bad patterns fail here, before any traversal
    let config = load_config_file(config_path)?;
    let request = resolve_request(args, &config.ls, terminal_width())?;
    log::debug!("listing {:?}", request.paths());
    if let Some(pattern) = request.ignore() {
        log::debug!("ignoring entries matching {}", pattern.as_str());
    }

    // 2. List
    let listing = lister::list(&request);

    // 3. Report, keeping diagnostics off stdout
    report(&listing);

    let mut stdout = io::stdout().lock();
    stdout.write_all(listing.output.as_bytes())?;
    stdout.flush()?;

    if listing.all_failed() {
        return Err(ListError::AllPathsFailed {
            count: listing.errors.len(),
        }
        .into());
    }

    Ok(ExitCode::SUCCESS)
}

fn report(listing: &Listing) {
    for err in &listing.errors {
        log::error!("cannot access {}", err);
    }
    for warning in &listing.warnings {
        log::warn!("{}", warning);
    }
}
