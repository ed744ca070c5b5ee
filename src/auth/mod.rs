//! Identity provider abstraction and its implementations.
//!
//! The sign-up flow talks to the provider only through [`IdentityProvider`].
//! [`InMemoryProvider`] backs tests and offline mode;
//! [`IdentityToolkitProvider`] talks to the hosted REST API.

mod error;
mod listeners;
mod memory;
mod rest;

use async_trait::async_trait;

use crate::model::Session;

pub use error::AuthError;
pub use listeners::{AuthStateCallback, AuthStateListeners, Subscription};
pub use memory::InMemoryProvider;
pub use rest::IdentityToolkitProvider;

/// The hosted identity service the app delegates authentication to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers `callback` for auth-state changes.
    ///
    /// The callback is invoked immediately with the current session, then on
    /// every sign-in and sign-out. Dropping the returned [`Subscription`]
    /// unregisters it.
    fn on_auth_state_changed(&self, callback: AuthStateCallback) -> Subscription;

    /// Returns the signed-in session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Creates an account and signs it in.
    ///
    /// Fails with [`AuthError::AccountExists`] if the email is already registered.
    async fn create_user(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Asks the provider to email a verification link to the session's user.
    async fn send_email_verification(&self, session: &Session) -> Result<(), AuthError>;

    /// Signs in an existing account.
    ///
    /// Fails with [`AuthError::InvalidCredentials`] on unknown email or wrong password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
