//! Notification capability for user-facing alerts.

use crate::model::notice::Notice;

/// Receives notices that must be shown to the user.
///
/// Implementations decide the surface: a terminal line, a dialog, or a
/// response envelope field.
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

/// Collects notices in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns and clears the collected notices.
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
