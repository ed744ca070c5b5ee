//! The sign-up flow: a pure reducer over [`FlowState`] plus the effects it
//! asks the app to run against the identity provider.

mod observer;
mod register;
mod state;

pub use observer::SessionObserver;
pub use register::{RegistrationOutcome, register};
pub use state::{Effect, Event, FlowState, Notice, NoticeKind, reduce};
