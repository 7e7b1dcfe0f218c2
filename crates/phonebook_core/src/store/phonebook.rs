//! Phonebook store.
//!
//! # Responsibility
//! - Own the newest-first contact sequence and the transient filter.
//! - Validate and apply add/delete requests.
//! - Persist the full sequence after every successful mutation.
//!
//! # Invariants
//! - No two contacts share an exact `name`.
//! - A duplicate `number` is announced but does not block insertion.
//! - Storage is written only after the in-memory sequence changed; a failed
//!   write leaves memory ahead of storage and the error goes to the caller.
//! - The filter is never persisted.

use crate::model::contact::{Contact, ContactId};
use crate::model::notice::Notice;
use crate::storage::{ContactStorage, StorageError};
use crate::store::notifier::Notifier;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PhonebookResult<T> = Result<T, PhonebookError>;

/// Phonebook operation error.
#[derive(Debug)]
pub enum PhonebookError {
    /// Name or number was empty.
    MissingFields,
    /// A contact with this exact name already exists.
    DuplicateName(String),
    /// Reading or writing the contacts slot failed.
    Storage(StorageError),
}

impl Display for PhonebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "all fields are required"),
            Self::DuplicateName(name) => write!(f, "{name} is already in contacts"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PhonebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for PhonebookError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// In-memory phonebook mirrored to a [`ContactStorage`].
pub struct Phonebook<S: ContactStorage, N: Notifier> {
    storage: S,
    notifier: N,
    contacts: Vec<Contact>,
    filter: String,
}

impl<S: ContactStorage, N: Notifier> Phonebook<S, N> {
    /// Restores the contact sequence from `storage`.
    ///
    /// Absent or undecodable snapshots start an empty phonebook without
    /// notifying the user. Read faults are returned.
    pub fn initialize(storage: S, notifier: N) -> PhonebookResult<Self> {
        let restored = storage.load()?;
        let contacts = restored.unwrap_or_default();
        info!(
            "event=phonebook_init module=store status=ok backend={} contacts={}",
            storage.backend_name(),
            contacts.len()
        );

        Ok(Self {
            storage,
            notifier,
            contacts,
            filter: String::new(),
        })
    }

    /// Adds a contact in front of the sequence.
    ///
    /// # Contract
    /// - Empty `name` or `number`: notifies and returns `MissingFields`.
    /// - Exact `name` match: notifies and returns `DuplicateName`.
    /// - Exact `number` match: notifies, then inserts anyway.
    /// - Returns the created contact after the snapshot was written.
    pub fn add_contact(
        &mut self,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> PhonebookResult<Contact> {
        let name = name.into();
        let number = number.into();

        if name.is_empty() || number.is_empty() {
            debug!("event=contact_add module=store status=rejected reason=missing_fields");
            self.notifier.notify(&Notice::MissingFields);
            return Err(PhonebookError::MissingFields);
        }

        if self.contacts.iter().any(|contact| contact.name == name) {
            debug!("event=contact_add module=store status=rejected reason=duplicate_name");
            self.notifier.notify(&Notice::DuplicateName(name.clone()));
            return Err(PhonebookError::DuplicateName(name));
        }

        if self.contacts.iter().any(|contact| contact.number == number) {
            debug!("event=contact_add module=store status=warned reason=duplicate_number");
            self.notifier.notify(&Notice::DuplicateNumber(number.clone()));
        }

        let contact = self.fresh_contact(name, number);
        self.contacts.insert(0, contact.clone());
        self.persist("contact_add")?;
        Ok(contact)
    }

    /// Removes the contact with `id`.
    ///
    /// Returns whether a contact was removed. Unknown ids change nothing but
    /// the snapshot is still rewritten.
    pub fn delete_contact(&mut self, id: &str) -> PhonebookResult<bool> {
        let before = self.contacts.len();
        self.contacts.retain(|contact| contact.id != id);
        let removed = self.contacts.len() != before;
        self.persist("contact_delete")?;
        Ok(removed)
    }

    /// Replaces the filter text verbatim.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Contacts whose name contains the filter, ignoring case, in stored
    /// order.
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        let needle = self.filter.to_lowercase();
        self.contacts
            .iter()
            .filter(|contact| contact.name_contains_lowercase(&needle))
            .collect()
    }

    /// Full newest-first sequence, ignoring the filter.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Drives the "no contacts yet" placeholder.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// The filter control is offered once there is more than one contact.
    pub fn shows_filter(&self) -> bool {
        self.contacts.len() > 1
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Consumes the store and hands back its collaborators.
    pub fn into_parts(self) -> (S, N) {
        (self.storage, self.notifier)
    }

    fn fresh_contact(&self, name: String, number: String) -> Contact {
        loop {
            let contact = Contact::new(name.clone(), number.clone());
            if !self.contacts.iter().any(|existing| existing.id == contact.id) {
                return contact;
            }
        }
    }

    fn persist(&mut self, event: &'static str) -> PhonebookResult<()> {
        match self.storage.save(&self.contacts) {
            Ok(()) => {
                info!(
                    "event={event} module=store status=ok backend={} contacts={}",
                    self.storage.backend_name(),
                    self.contacts.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event={event} module=store status=error backend={} error_code=persist_failed error={}",
                    self.storage.backend_name(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Phonebook, PhonebookError};
    use crate::model::notice::Notice;
    use crate::storage::{ContactStorage, MemoryStorage, StorageError, StorageResult};
    use crate::store::notifier::RecordingNotifier;

    struct ReadOnlyStorage;

    impl ContactStorage for ReadOnlyStorage {
        fn read_slot(&self) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn write_slot(&mut self, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "quota exceeded",
            )))
        }

        fn backend_name(&self) -> &'static str {
            "read_only"
        }
    }

    #[test]
    fn rejected_adds_do_not_touch_storage() {
        let mut book =
            Phonebook::initialize(MemoryStorage::new(), RecordingNotifier::new()).unwrap();
        book.add_contact("Rosie Simpson", "459-12-56").unwrap();

        assert!(matches!(
            book.add_contact("", "1"),
            Err(PhonebookError::MissingFields)
        ));
        assert!(matches!(
            book.add_contact("Rosie Simpson", "000"),
            Err(PhonebookError::DuplicateName(_))
        ));
        assert_eq!(book.storage().write_count(), 1);
    }

    #[test]
    fn write_failure_propagates_to_caller() {
        let mut book = Phonebook::initialize(ReadOnlyStorage, RecordingNotifier::new()).unwrap();
        let err = book.add_contact("Eden Clements", "645-17-79").unwrap_err();
        assert!(matches!(err, PhonebookError::Storage(StorageError::Io(_))));
        assert!(book.notifier().notices().is_empty());
    }

    #[test]
    fn filter_is_kept_verbatim() {
        let mut book =
            Phonebook::initialize(MemoryStorage::new(), RecordingNotifier::new()).unwrap();
        book.set_filter("  Ann ");
        assert_eq!(book.filter(), "  Ann ");
    }

    #[test]
    fn shows_filter_only_with_more_than_one_contact() {
        let mut book =
            Phonebook::initialize(MemoryStorage::new(), RecordingNotifier::new()).unwrap();
        assert!(book.is_empty());
        assert!(!book.shows_filter());

        book.add_contact("Rosie Simpson", "459-12-56").unwrap();
        assert!(!book.is_empty());
        assert!(!book.shows_filter());

        book.add_contact("Hermione Kline", "443-89-12").unwrap();
        assert!(book.shows_filter());
    }

    #[test]
    fn duplicate_number_notice_precedes_insert() {
        let mut book =
            Phonebook::initialize(MemoryStorage::new(), RecordingNotifier::new()).unwrap();
        book.add_contact("Rosie Simpson", "459-12-56").unwrap();
        book.add_contact("Rosa Simpson", "459-12-56").unwrap();

        assert_eq!(
            book.notifier().notices(),
            &[Notice::DuplicateNumber("459-12-56".to_string())]
        );
        assert_eq!(book.len(), 2);
    }
}
