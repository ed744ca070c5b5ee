use std::fmt;

use super::register::RegistrationOutcome;
use crate::model::{
    Department, FormInput, RegistrationField, Session, Step, ValidationError,
    validate_registration,
};

/// Whether a notice reports success or a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A blocking message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn success(title: &str, message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn from_validation(error: &ValidationError) -> Self {
        let title = match error {
            ValidationError::InvalidEmailDomain(_) => "Invalid Email",
            ValidationError::MissingDetails => "Error",
        };
        Self::error(title, error.to_string())
    }
}

/// Everything that can happen to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A registration text field was edited.
    FieldChanged(RegistrationField, String),
    /// The user pressed "Verify Email & Join".
    SubmitRegistration,
    /// The registration request finished.
    RegistrationSettled(RegistrationOutcome),
    /// A department chip was selected.
    SelectDepartment(Department),
    /// The user pressed "Enter Campus".
    ConfirmProfile,
    /// The user asked to log out.
    LogoutRequested,
    /// The provider finished signing out.
    SignedOut,
    /// The provider reported the current session.
    SessionChanged(Option<Session>),
    /// The user dismissed the current notice.
    DismissNotice,
}

/// Work the reducer asks the app to perform against the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create an account, falling back to sign-in if it exists.
    Register { email: String, password: String },
    /// Sign the current user out.
    SignOut,
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { email, .. } => f
                .debug_struct("Register")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Self::SignOut => f.write_str("SignOut"),
        }
    }
}

/// All mutable UI state of the sign-up flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowState {
    step: Step,
    form: FormInput,
    loading: bool,
    notice: Option<Notice>,
    signed_in_as: Option<String>,
}

impl FlowState {
    /// Initial state: registration screen, empty form, idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The screen currently shown.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Everything the user has entered.
    pub fn form(&self) -> &FormInput {
        &self.form
    }

    /// `true` while a registration request is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The notice awaiting dismissal, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Email of the session last reported by the provider.
    pub fn signed_in_as(&self) -> Option<&str> {
        self.signed_in_as.as_deref()
    }
}

/// Applies `event` to `state`, returning the new state and the effects to run.
///
/// Pure: all provider interaction happens through the returned [`Effect`]s,
/// whose completion comes back as further events.
pub fn reduce(mut state: FlowState, event: Event) -> (FlowState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::FieldChanged(field, value) => state.form.set(field, value),
        Event::SubmitRegistration => {
            if state.loading || state.step != Step::Registration {
                return (state, effects);
            }
            let form = &state.form;
            match validate_registration(&form.name, &form.email, &form.password) {
                Ok(()) => {
                    state.loading = true;
                    effects.push(Effect::Register {
                        email: form.email.clone(),
                        password: form.password.clone(),
                    });
                }
                Err(e) => state.notice = Some(Notice::from_validation(&e)),
            }
        }
        Event::RegistrationSettled(outcome) => {
            state.loading = false;
            match outcome {
                RegistrationOutcome::Created(_) => {
                    state.notice = Some(Notice::success(
                        "Success",
                        "A verification link has been sent to your email.",
                    ));
                    state.step = Step::ProfileSetup;
                }
                RegistrationOutcome::SignedIn(_) => state.step = Step::Feed,
                RegistrationOutcome::LoginFailed => {
                    state.notice = Some(Notice::error(
                        "Login Error",
                        "Wrong password or account issue.",
                    ));
                }
                RegistrationOutcome::Failed(message) => {
                    state.notice = Some(Notice::error("Auth Error", message));
                }
            }
        }
        Event::SelectDepartment(dept) => state.form.section = Some(dept),
        Event::ConfirmProfile => state.step = Step::Feed,
        Event::LogoutRequested => effects.push(Effect::SignOut),
        Event::SignedOut => {
            state.step = Step::Registration;
            state.signed_in_as = None;
        }
        Event::SessionChanged(Some(session)) => {
            state.signed_in_as = Some(session.email);
            state.step = Step::Feed;
        }
        Event::SessionChanged(None) => state.signed_in_as = None,
        Event::DismissNotice => state.notice = None,
    }

    (state, effects)
}
