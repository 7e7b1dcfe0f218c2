//! Domain model for phonebook entries and user-facing notices.
//!
//! # Responsibility
//! - Define the persisted contact record shape.
//! - Define the notices raised back to the user on rejected or suspicious input.
//!
//! # Invariants
//! - Every contact is identified by an id assigned once at creation.
//! - Contacts are immutable after creation; there is no edit path.

pub mod contact;
pub mod notice;
