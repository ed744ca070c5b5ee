//! Actions returned by screen event handlers.

use crossterm::event::KeyEvent;

use crate::model::{Department, RegistrationField};

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` turns these into flow events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// A registration field now holds the given value.
    UpdateField(RegistrationField, String),
    /// Submit the registration form.
    SubmitRegistration,
    /// Choose a department.
    SelectDepartment(Department),
    /// Leave profile setup for the feed.
    ConfirmProfile,
    /// Sign out and return to registration.
    Logout,
    /// Quit the application.
    Quit,
}

/// Common behavior for all screen state types.
pub trait ScreenHandler {
    /// Process a key event and return an [`Action`] for the `App` to apply.
    fn handle_key(&mut self, key: KeyEvent) -> Action;
}
