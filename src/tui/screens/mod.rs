//! TUI screen implementations, one per step of the sign-up flow.

pub mod feed;
pub mod profile;
pub mod registration;

pub use feed::{FeedState, draw_feed};
pub use profile::{ProfileState, draw_profile};
pub use registration::{RegistrationState, draw_registration};
