//! User-facing notices.
//!
//! Notices are the blocking alerts shown on add. They carry the user's own
//! input, so they go to the notifier only and never into log records.

use std::fmt::{Display, Formatter};

/// Notification raised while handling an add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Name or number was left empty. The add is rejected.
    MissingFields,
    /// A contact with this exact name exists. The add is rejected.
    DuplicateName(String),
    /// A contact with this exact number exists. The add still proceeds.
    DuplicateNumber(String),
}

impl Notice {
    /// Stable machine-readable code for diagnostics and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::DuplicateName(_) => "duplicate_name",
            Self::DuplicateNumber(_) => "duplicate_number",
        }
    }

    /// Whether the notice rejected the request.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::DuplicateNumber(_))
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Please enter all fields!"),
            Self::DuplicateName(name) => write!(f, "{name} is already in contacts"),
            Self::DuplicateNumber(number) => write!(f, "{number} is already in contacts"),
        }
    }
}
