use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lenv",
    author,
    version,
    about = "Run Linux-style shell commands on any operating system",
    long_about = "lenv executes basic Linux shell commands regardless of the underlying \
                  operating system, translating them to the host's native behavior.",
    propagate_version = true
)]
pub struct Cli {
    /// Read defaults from this TOML file instead of ~/.config/lenv/config.toml
    #[arg(long, global = true, env = "LENV_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Every command lenv knows about.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List directory contents
    #[command(
        visible_alias = "list",
        long_about = "List information about the FILEs. \
                      Entries are sorted alphabetically."
    )]
    Ls(LsArgs),
}

#[derive(Args, Debug, Default)]
#[command(group(
    ArgGroup::new("layout")
        .required(false)
        .args(["columns", "lines"]),
))]
pub struct LsArgs {
    /// Files or directories to list
    #[arg(required = true, num_args = 1.., value_name = "PATH")]
    pub paths: Vec<String>,

    /// Do not ignore entries starting with .
    #[arg(short, long)]
    pub all: bool,

    /// With -l, print the author of each file
    #[arg(long)]
    pub author: bool,

    /// List directories themselves, not their contents
    #[arg(short = 'd', long = "directory", visible_alias = "dirs")]
    pub directory: bool,

    /// List subdirectories recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// List entries by columns
    #[arg(short = 'C', long)]
    pub columns: bool,

    /// Use a long listing format
    #[arg(short, long)]
    pub long: bool,

    /// List one entry per line instead of by columns
    #[arg(short = '1', long)]
    pub lines: bool,

    /// Reverse order while sorting
    #[arg(short, long)]
    pub reverse: bool,

    /// Do not list implied entries matching shell PATTERN
    #[arg(short = 'I', long, value_name = "PATTERN")]
    pub ignore: Option<String>,

    /// Assume the screen is COLS wide
    #[arg(short, long, value_name = "COLS")]
    pub width: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn ls(args: &[&str]) -> LsArgs {
        let argv = ["lenv", "ls"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Ls(ls) => ls,
        }
    }

    #[test]
    fn test_command_table_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let args = ls(&["-alRr1", "-I", "*.o", "src", "docs"]);
        assert!(args.all && args.long && args.recursive && args.reverse && args.lines);
        assert!(!args.columns);
        assert_eq!(args.ignore.as_deref(), Some("*.o"));
        assert_eq!(args.paths, ["src", "docs"]);
    }

    #[test]
    fn test_long_flags_and_alias() {
        let argv = ["lenv", "list", "--dirs", "--author", "--width", "40", "."];
        let Command::Ls(args) = Cli::try_parse_from(argv).unwrap().command;
        assert!(args.directory && args.author);
        assert_eq!(args.width, Some(40));
    }

    #[test]
    fn test_short_binary_name() {
        let Command::Ls(args) = Cli::try_parse_from(["lv", "ls", "-l", "."]).unwrap().command;
        assert!(args.long);
        assert_eq!(args.paths, ["."]);
    }

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["lenv", "ls", "-a"]).is_err());
    }

    #[test]
    fn test_layouts_are_exclusive() {
        assert!(Cli::try_parse_from(["lenv", "ls", "-C", "-1", "."]).is_err());
    }
}
