//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose add/delete/list phonebook operations to Dart via FRB.
//! - Turn notices and faults into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call restores the phonebook from storage, applies one user event,
//!   and lets the store write the snapshot back.
//! - The filter is a call argument; it is never stored.

use log::error;
use phonebook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_storage,
    ping as ping_inner, Contact, ContactStorage, Notice, Phonebook, PhonebookConfig,
    PhonebookError, RecordingNotifier,
};
use std::sync::{Mutex, OnceLock};

static FFI_CONFIG: OnceLock<Result<PhonebookConfig, String>> = OnceLock::new();
// Load-modify-save must not interleave between UI threads.
static PHONEBOOK_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Contact row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: String,
    pub name: String,
    pub number: String,
}

impl From<&Contact> for ContactItem {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            number: contact.number.clone(),
        }
    }
}

/// View model for the contacts screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    /// Contacts matching the filter, newest first.
    pub items: Vec<ContactItem>,
    /// Number of stored contacts before filtering.
    pub total: u32,
    /// Whether the filter input should be shown.
    pub show_filter: bool,
    /// Empty on success; failure text otherwise.
    pub message: String,
}

/// User-facing alert raised by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotice {
    /// `missing_fields|duplicate_name|duplicate_number`.
    pub code: String,
    pub message: String,
    /// `false` when the action still went through.
    pub blocking: bool,
}

impl From<&Notice> for ContactNotice {
    fn from(notice: &Notice) -> Self {
        Self {
            code: notice.code().to_string(),
            message: notice.to_string(),
            blocking: notice.is_blocking(),
        }
    }
}

/// Result envelope for add/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether the contact list changed as requested.
    pub ok: bool,
    /// Created contact id for successful adds.
    pub contact_id: Option<String>,
    /// Alerts to show, in order.
    pub notices: Vec<ContactNotice>,
    pub message: String,
}

impl ContactActionResponse {
    fn failure(message: impl Into<String>, notices: Vec<ContactNotice>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            notices,
            message: message.into(),
        }
    }
}

type FfiPhonebook = Phonebook<Box<dyn ContactStorage>, RecordingNotifier>;

/// Lists contacts whose name contains `filter`, ignoring case.
///
/// # FFI contract
/// - Sync call, storage-backed execution.
/// - Never panics; failures return an empty list with `message` set.
#[flutter_rust_bridge::frb(sync)]
pub fn phonebook_list(filter: String) -> ContactListResponse {
    let result = with_phonebook(|book| {
        book.set_filter(filter);
        ContactListResponse {
            items: book
                .visible_contacts()
                .into_iter()
                .map(ContactItem::from)
                .collect(),
            total: u32::try_from(book.len()).unwrap_or(u32::MAX),
            show_filter: book.shows_filter(),
            message: String::new(),
        }
    });
    match result {
        Ok(response) => response,
        Err(message) => ContactListResponse {
            items: Vec::new(),
            total: 0,
            show_filter: false,
            message: format!("phonebook_list failed: {message}"),
        },
    }
}

/// Adds a contact from the form inputs.
///
/// Inputs are taken as typed; no trimming.
///
/// # FFI contract
/// - Sync call, storage-backed execution.
/// - Never panics.
/// - A duplicate number still adds the contact and returns a non-blocking
///   notice alongside `ok = true`.
#[flutter_rust_bridge::frb(sync)]
pub fn phonebook_add(name: String, number: String) -> ContactActionResponse {
    let result = with_phonebook(|book| {
        let outcome = book.add_contact(name, number);
        (outcome, drain_notices(book))
    });
    let (outcome, notices) = match result {
        Ok(pair) => pair,
        Err(message) => {
            return ContactActionResponse::failure(
                format!("phonebook_add failed: {message}"),
                Vec::new(),
            );
        }
    };

    match outcome {
        Ok(contact) => ContactActionResponse {
            ok: true,
            contact_id: Some(contact.id),
            notices,
            message: "Contact added.".to_string(),
        },
        Err(err @ PhonebookError::Storage(_)) => {
            error!("event=ffi_add module=ffi status=error error={err}");
            ContactActionResponse::failure(format!("phonebook_add failed: {err}"), notices)
        }
        Err(err) => ContactActionResponse::failure(err.to_string(), notices),
    }
}

/// Deletes a contact by id. Unknown ids succeed without changes.
///
/// # FFI contract
/// - Sync call, storage-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn phonebook_delete(id: String) -> ContactActionResponse {
    let result = with_phonebook(|book| book.delete_contact(&id))
        .and_then(|deleted| deleted.map_err(|err| err.to_string()));
    match result {
        Ok(removed) => ContactActionResponse {
            ok: true,
            contact_id: None,
            notices: Vec::new(),
            message: if removed {
                "Contact deleted.".to_string()
            } else {
                "No such contact.".to_string()
            },
        },
        Err(message) => ContactActionResponse::failure(
            format!("phonebook_delete failed: {message}"),
            Vec::new(),
        ),
    }
}

fn resolve_config() -> Result<PhonebookConfig, String> {
    FFI_CONFIG
        .get_or_init(|| PhonebookConfig::from_env().map_err(|err| err.to_string()))
        .clone()
}

fn with_phonebook<T>(f: impl FnOnce(&mut FfiPhonebook) -> T) -> Result<T, String> {
    let _guard = PHONEBOOK_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let config = resolve_config()?;
    let storage = open_storage(&config).map_err(|err| format!("storage open failed: {err}"))?;
    let mut book = Phonebook::initialize(storage, RecordingNotifier::new())
        .map_err(|err| format!("contacts load failed: {err}"))?;
    Ok(f(&mut book))
}

fn drain_notices(book: &mut FfiPhonebook) -> Vec<ContactNotice> {
    book.notifier_mut()
        .take()
        .iter()
        .map(ContactNotice::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, phonebook_add, phonebook_delete, phonebook_list, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_then_list_finds_contact_by_filter() {
        let name = unique_token("Ffi Listed");
        let added = phonebook_add(name.clone(), unique_token("num"));
        assert!(added.ok, "{}", added.message);
        let id = added.contact_id.expect("add should return contact_id");

        let listed = phonebook_list(name.to_uppercase());
        assert!(listed.message.is_empty(), "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, id);
        assert!(listed.total >= 1);
    }

    #[test]
    fn add_rejects_empty_and_duplicate_name() {
        let empty = phonebook_add(String::new(), "123".to_string());
        assert!(!empty.ok);
        assert_eq!(empty.notices[0].code, "missing_fields");
        assert_eq!(empty.notices[0].message, "Please enter all fields!");

        let name = unique_token("Ffi Duplicate");
        assert!(phonebook_add(name.clone(), unique_token("num")).ok);
        let duplicate = phonebook_add(name.clone(), unique_token("num"));
        assert!(!duplicate.ok);
        assert_eq!(duplicate.notices[0].code, "duplicate_name");
        assert!(duplicate.notices[0].blocking);
        assert_eq!(
            duplicate.notices[0].message,
            format!("{name} is already in contacts")
        );
    }

    #[test]
    fn duplicate_number_adds_with_non_blocking_notice() {
        let number = unique_token("num");
        assert!(phonebook_add(unique_token("Ffi First"), number.clone()).ok);

        let second = phonebook_add(unique_token("Ffi Second"), number);
        assert!(second.ok, "{}", second.message);
        assert!(second.contact_id.is_some());
        assert_eq!(second.notices.len(), 1);
        assert_eq!(second.notices[0].code, "duplicate_number");
        assert!(!second.notices[0].blocking);
    }

    #[test]
    fn delete_removes_contact_and_tolerates_unknown_id() {
        let name = unique_token("Ffi Deleted");
        let id = phonebook_add(name.clone(), unique_token("num"))
            .contact_id
            .expect("add should return contact_id");

        let deleted = phonebook_delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(phonebook_list(name).items.is_empty());

        let unknown = phonebook_delete(unique_token("missing"));
        assert!(unknown.ok);
        assert_eq!(unknown.message, "No such contact.");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}-{}", std::process::id())
    }
}
