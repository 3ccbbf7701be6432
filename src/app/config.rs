use crate::app::cli::LsArgs;
use crate::app::models::Layout;
use crate::app::request::{ListingRequest, DEFAULT_WIDTH};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub ls: LsDefaults,
}

/// Defaults for `ls`, applied underneath whatever the command line says.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct LsDefaults {
    pub all: bool,
    pub author: bool,
    pub directory: bool,
    pub recursive: bool,
    pub long: bool,
    pub reverse: bool,
    pub layout: Option<Layout>,
    pub ignore: Option<String>,
    pub width: Option<usize>,
}

fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("lenv").join("config.toml"))
}

/// Loads the config file. A missing default file just means no defaults;
/// a file named explicitly has to exist.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                log::debug!("no config at {:?}, using built-in defaults", path);
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_config(&content).context(format!("Failed to parse {:?}", config_path))
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Best guess at the output width when none is configured.
pub fn terminal_width() -> Option<usize> {
    if std::io::stdout().is_terminal() {
        if let Ok((cols, _)) = crossterm::terminal::size() {
            if cols > 0 {
                return Some(cols as usize);
            }
        }
    }

    env::var("COLUMNS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
}

/// Merges command-line flags over config defaults into a validated request.
///
/// Switches are OR'ed. For valued options the command line wins.
pub fn resolve_request(
    cli: LsArgs,
    defaults: &LsDefaults,
    detected_width: Option<usize>,
) -> Result<ListingRequest> {
    let layout = if cli.columns {
        Layout::Columns
    } else if cli.lines {
        Layout::Lines
    } else {
        defaults.layout.unwrap_or_default()
    };

    let width = cli
        .width
        .or(defaults.width)
        .or(detected_width)
        .unwrap_or(DEFAULT_WIDTH);

    let request = ListingRequest::builder()
        .paths(cli.paths)
        .show_hidden(cli.all || defaults.all)
        .show_author(cli.author || defaults.author)
        .list_dirs_as_entries(cli.directory || defaults.directory)
        .recursive(cli.recursive || defaults.recursive)
        .long_format(cli.long || defaults.long)
        .reverse_sort(cli.reverse || defaults.reverse)
        .layout(layout)
        .ignore(cli.ignore.or_else(|| defaults.ignore.clone()))
        .width(width)
        .build()?;

    Ok(request)
}
