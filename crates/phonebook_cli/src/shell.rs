//! Interactive line-oriented session.
//!
//! Each line is one user event. Mutations and filter edits re-render the
//! view; rejected adds are reported by the notifier and the session goes on.
//! Storage faults end the session with an error.

use crate::render::render;
use anyhow::Result;
use log::info;
use phonebook_core::{ContactStorage, Notifier, Phonebook, PhonebookError};
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  add <name> <number>     number is the last word
  add <name>, <number>    comma form for numbers with spaces
  delete <id>
  filter [text]           empty text clears the filter
  list
  help
  quit";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Add { name: &'a str, number: &'a str },
    Delete(&'a str),
    Filter(&'a str),
    List,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Option<ShellCommand<'_>> {
    let line = line.trim_end_matches(['\n', '\r']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let (verb, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let command = match verb {
        "add" => {
            let (name, number) = split_add_args(rest);
            ShellCommand::Add { name, number }
        }
        "delete" | "rm" => ShellCommand::Delete(rest.trim()),
        "filter" => ShellCommand::Filter(rest),
        "list" | "ls" => ShellCommand::List,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other),
    };
    Some(command)
}

fn split_add_args(args: &str) -> (&str, &str) {
    if let Some((name, number)) = args.rsplit_once(',') {
        return (name.trim(), number.trim());
    }
    let args = args.trim();
    match args.rsplit_once(char::is_whitespace) {
        Some((name, number)) => (name.trim(), number.trim()),
        None => (args, ""),
    }
}

/// Runs the session until `quit` or end of input.
pub(crate) fn run<S: ContactStorage, N: Notifier>(
    book: &mut Phonebook<S, N>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    info!("event=shell_start module=cli status=ok contacts={}", book.len());
    render(book, out)?;

    for line in input.lines() {
        let line = line?;
        let Some(command) = parse_line(&line) else {
            continue;
        };

        match command {
            ShellCommand::Add { name, number } => match book.add_contact(name, number) {
                Ok(contact) => {
                    writeln!(out, "added {}", contact.id)?;
                    render(book, out)?;
                }
                Err(PhonebookError::MissingFields) | Err(PhonebookError::DuplicateName(_)) => {}
                Err(err @ PhonebookError::Storage(_)) => return Err(err.into()),
            },
            ShellCommand::Delete(id) => {
                book.delete_contact(id)?;
                render(book, out)?;
            }
            ShellCommand::Filter(text) => {
                book.set_filter(text);
                render(book, out)?;
            }
            ShellCommand::List => render(book, out)?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => break,
            ShellCommand::Unknown(verb) => {
                writeln!(out, "unknown command `{verb}`; type `help`")?;
            }
        }
    }

    info!("event=shell_stop module=cli status=ok contacts={}", book.len());
    Ok(())
}
