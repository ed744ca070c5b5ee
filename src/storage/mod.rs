//! Local persistence for the identity provider's session cache.
//!
//! The sign-up flow itself stores nothing; only provider adapters that
//! need to remember a signed-in user across restarts use this.

mod error;
mod session_store;

pub use error::StorageError;
pub use session_store::SessionStore;
