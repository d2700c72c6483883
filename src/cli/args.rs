//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Merge two or more YAML or JSON documents together.
///
/// Documents are merged in the order they appear on the command line, later
/// documents taking priority. Mappings are deep-merged, sequences and scalars
/// are replaced. Output defaults to YAML.
#[derive(Parser, Debug)]
#[command(name = "docmerge")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Strict mode: value types for any given key must be the same
    #[arg(short, long)]
    pub strict: bool,

    /// Output JSON instead of YAML (auto-enabled for a .json output file)
    #[arg(short, long)]
    pub json: bool,

    /// Output file (stdout if not present)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// List the files being merged on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Debug logging to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Files to merge, lowest priority first; an argument may be a comma-separated list
    #[arg(
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        required_unless_present_any = ["completions", "show_config"]
    )]
    pub files: Vec<String>,
}

impl Cli {
    /// Input paths in merge order, with comma-separated arguments expanded.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .flat_map(|arg| arg.split(','))
            .map(PathBuf::from)
            .collect()
    }
}
