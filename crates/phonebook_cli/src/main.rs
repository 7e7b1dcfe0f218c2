//! `phonebook` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from environment plus flags.
//! - Open the configured storage and run one command or the shell.

mod render;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use phonebook_core::{
    init_logging, normalize_level, open_storage, Notice, Notifier, Phonebook, PhonebookConfig,
    PhonebookError, StorageBackend,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "phonebook", version, about = "Keep a local phonebook of names and numbers")]
struct Cli {
    /// Storage backend (overrides PHONEBOOK_BACKEND).
    #[arg(long, value_parser = parse_backend)]
    backend: Option<StorageBackend>,

    /// Directory holding the contacts slot (overrides PHONEBOOK_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (overrides PHONEBOOK_LOG_LEVEL).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a contact.
    Add { name: String, number: String },
    /// Delete a contact by id.
    Delete { id: String },
    /// List contacts, optionally filtered by name.
    List {
        #[arg(long, short, default_value = "")]
        filter: String,
    },
    /// Interactive session; the filter lasts until exit.
    Shell,
}

/// Prints notices to stderr as alerts.
pub(crate) struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, notice: &Notice) {
        eprintln!("alert: {notice}");
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = resolve_config(&cli)?;
    if let Err(err) = init_logging(config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let storage = open_storage(&config).with_context(|| {
        format!(
            "failed to open {} storage in `{}`",
            config.backend.as_str(),
            config.data_dir.display()
        )
    })?;
    let mut book = Phonebook::initialize(storage, StderrNotifier)
        .context("failed to load contacts")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = match cli.command {
        Command::Add { name, number } => {
            let outcome = book.add_contact(name, number);
            report_outcome(outcome.map(|contact| contact.id), &mut out)?
        }
        Command::Delete { id } => {
            if !book.delete_contact(&id)? {
                warn!("event=cli_delete module=cli status=noop");
            }
            render::render(&book, &mut out)?;
            ExitCode::SUCCESS
        }
        Command::List { filter } => {
            book.set_filter(filter);
            render::render(&book, &mut out)?;
            ExitCode::SUCCESS
        }
        Command::Shell => {
            let stdin = io::stdin();
            shell::run(&mut book, stdin.lock(), &mut out)?;
            ExitCode::SUCCESS
        }
    };
    out.flush()?;
    Ok(code)
}

fn resolve_config(cli: &Cli) -> Result<PhonebookConfig> {
    let mut config = PhonebookConfig::from_env().context("invalid phonebook environment")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(data_dir) = &cli.data_dir {
        let data_dir = std::path::absolute(data_dir)
            .with_context(|| format!("invalid data dir `{}`", data_dir.display()))?;
        config = config.with_data_dir(data_dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = normalize_level(level).map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    value.parse().map_err(|err| format!("{err}"))
}

/// Maps a one-shot add result to output and exit status.
///
/// Rejections were already announced by the notifier; storage faults bubble.
fn report_outcome(
    outcome: Result<String, PhonebookError>,
    out: &mut impl Write,
) -> Result<ExitCode> {
    match outcome {
        Ok(id) => {
            writeln!(out, "added {id}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(PhonebookError::MissingFields) | Err(PhonebookError::DuplicateName(_)) => {
            Ok(ExitCode::from(2))
        }
        Err(err @ PhonebookError::Storage(_)) => Err(err.into()),
    }
}
