//! Phonebook use-case layer.
//!
//! # Responsibility
//! - Hold the in-memory contact sequence and filter text.
//! - Apply insertion rules and mirror every mutation to storage.
//! - Route user-facing notices to an injected notifier.
//!
//! # See also
//! - `crate::storage` for the persistence contract.

pub mod notifier;
pub mod phonebook;
