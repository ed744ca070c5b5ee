use crate::storage::StorageError;

/// Failures reported by an [`IdentityProvider`](super::IdentityProvider).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// An account is already registered for this email.
    #[error("an account already exists for this email")]
    AccountExists,

    /// Sign-in was refused: unknown email, wrong password or disabled account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Any other error the provider reported; `message` is shown verbatim.
    #[error("{message}")]
    Provider {
        /// Provider error code, e.g. `WEAK_PASSWORD`.
        code: String,
        message: String,
    },

    /// The provider could not be reached or answered with an unreadable body.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The local session cache could not be read or written.
    #[error("session cache error: {0}")]
    Storage(#[from] StorageError),
}
