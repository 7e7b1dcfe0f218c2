//! Contact domain model.
//!
//! # Responsibility
//! - Define the `{id, name, number}` record mirrored to storage.
//! - Generate fresh identifiers for newly added contacts.
//!
//! # Invariants
//! - `id` is stable and never reassigned for the lifetime of a contact.
//! - Persisted ids are opaque strings; ids written by older clients are kept
//!   verbatim even when they are not UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque contact identifier.
///
/// Kept as a type alias so persisted ids of any shape stay readable.
pub type ContactId = String;

/// One phonebook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

impl Contact {
    /// Creates a contact with a freshly generated id.
    ///
    /// Does not validate `name`/`number`; the store owns insertion rules.
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self::with_id(generate_contact_id(), name, number)
    }

    /// Creates a contact with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: impl Into<ContactId>,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: number.into(),
        }
    }

    /// Case-insensitive substring match of `name` against an already
    /// lower-cased needle.
    pub fn name_contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

fn generate_contact_id() -> ContactId {
    Uuid::new_v4().simple().to_string()
}
