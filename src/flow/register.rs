use crate::auth::{AuthError, IdentityProvider};
use crate::model::Session;

/// How a registration attempt settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new account was created and a verification email requested.
    Created(Session),
    /// The account already existed and the fallback sign-in succeeded.
    SignedIn(Session),
    /// The account already existed and the fallback sign-in was refused.
    LoginFailed,
    /// Account creation failed for another reason; holds the provider's message.
    Failed(String),
}

/// Creates an account for `email`, falling back to sign-in if it already exists.
///
/// Steps run strictly in order: create, then request the verification email.
/// A failed verification request is logged and does not fail the
/// registration. The fallback sign-in is only attempted after creation
/// reports [`AuthError::AccountExists`]. Nothing is retried.
#[tracing::instrument(skip_all, fields(email = %email))]
pub async fn register(
    provider: &dyn IdentityProvider,
    email: &str,
    password: &str,
) -> RegistrationOutcome {
    match provider.create_user(email, password).await {
        Ok(session) => {
            tracing::info!(uid = %session.uid, "account created");
            if let Err(e) = provider.send_email_verification(&session).await {
                tracing::warn!(error = %e, "verification email request failed");
            }
            RegistrationOutcome::Created(session)
        }
        Err(AuthError::AccountExists) => {
            tracing::info!("account exists, attempting sign-in");
            match provider.sign_in(email, password).await {
                Ok(session) => {
                    tracing::info!(uid = %session.uid, "signed in existing account");
                    RegistrationOutcome::SignedIn(session)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "fallback sign-in failed");
                    RegistrationOutcome::LoginFailed
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "account creation failed");
            RegistrationOutcome::Failed(e.to_string())
        }
    }
}
