//! Text rendering of the phonebook view.

use phonebook_core::{ContactStorage, Notifier, Phonebook};
use std::io::{self, Write};

pub(crate) const EMPTY_PLACEHOLDER: &str =
    "Currently your phonebook has no contacts. Please add them.";

/// Writes heading, optional filter line and the visible contacts.
pub(crate) fn render<S: ContactStorage, N: Notifier>(
    book: &Phonebook<S, N>,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "Phonebook")?;
    writeln!(out, "Contacts")?;

    if book.shows_filter() {
        writeln!(out, "Find contacts by name: {:?}", book.filter())?;
    }

    if book.is_empty() {
        writeln!(out, "{EMPTY_PLACEHOLDER}")?;
        return Ok(());
    }

    for contact in book.visible_contacts() {
        writeln!(out, "  {}: {}  [{}]", contact.name, contact.number, contact.id)?;
    }
    Ok(())
}
