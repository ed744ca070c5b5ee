use thiserror::Error;

/// Validation errors for registration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all the details!")]
    MissingDetails,
    #[error("Only official college email (.ac.in or .edu) is allowed!")]
    InvalidEmailDomain(String),
}

/// Institutional email suffixes accepted at sign-up.
pub const ALLOWED_EMAIL_SUFFIXES: &[&str] = &[".ac.in", ".edu"];

/// Returns `true` if `email` ends with one of [`ALLOWED_EMAIL_SUFFIXES`].
///
/// This is a plain suffix test: no trimming, no case folding.
pub fn is_college_email(email: &str) -> bool {
    ALLOWED_EMAIL_SUFFIXES
        .iter()
        .any(|suffix| email.ends_with(suffix))
}

/// Validates registration input, stopping at the first failure.
///
/// Emptiness is checked before the email domain, so an empty email reports
/// [`ValidationError::MissingDetails`].
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingDetails);
    }
    if !is_college_email(email) {
        return Err(ValidationError::InvalidEmailDomain(email.to_string()));
    }
    Ok(())
}
