use crate::auth::AuthError;

/// Errors that can occur in the TUI layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The identity provider could not be set up.
    #[error("identity provider error: {0}")]
    Auth(#[from] AuthError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_converts() {
        let err: AppError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
        assert!(err.to_string().starts_with("identity provider error: "));
    }
}
