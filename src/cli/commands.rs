//! Command execution: wires CLI arguments, settings and the document pipeline

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{merge_documents, Access, IoResultExt, MergeOptions, OutputFormat};
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// Execute the command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    let settings = Settings::load()?;
    debug!("settings: {:?}", settings);

    if cli.show_config {
        write_stdout(settings.to_toml()?.as_bytes())?;
        return Ok(());
    }

    let container = ServiceContainer::new(settings);
    run_merge(cli, &container)
}

/// Merge the files named on the command line and write the result.
///
/// Nothing is written when any step fails.
#[instrument(skip_all)]
pub fn run_merge(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let sources = cli.source_paths();
    let options = merge_options(cli, &container.settings);
    debug!("options: {:?}", options);

    if cli.verbose {
        output::header("Files to be merged in this order:");
        output::blank();
    }

    let pipeline = container.pipeline();
    let opened = pipeline.open_sources(&sources, |i, path| {
        if cli.verbose {
            output::numbered(i + 1, &path.display());
        }
    })?;

    if cli.verbose {
        if let Some(path) = cli.output.as_deref() {
            output::blank();
            output::action("Output to", &path.display());
        }
    }

    let merged = merge_documents(&options, opened)?;

    match cli.output.as_deref() {
        Some(path) => write_file(container.fs.as_ref(), path, &merged)?,
        None => write_stdout(&merged)?,
    }
    Ok(())
}

/// Resolve merge options: flags can switch on what settings leave off.
pub fn merge_options(cli: &Cli, settings: &Settings) -> MergeOptions {
    let json = cli.json
        || settings.json
        || cli
            .output
            .as_deref()
            .and_then(OutputFormat::for_path)
            .is_some();

    MergeOptions {
        strict: cli.strict || settings.strict,
        format: if json {
            OutputFormat::Json
        } else {
            OutputFormat::Yaml
        },
        json_indent: settings.json_indent,
    }
}

fn write_file(fs: &dyn FileSystem, path: &Path, content: &[u8]) -> InfraResult<()> {
    fs.write_atomic(path, content)
        .with_path_context(Access::Writing, path)?;
    Ok(())
}

fn write_stdout(content: &[u8]) -> InfraResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content)
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::io("cannot write to stdout", e))
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
