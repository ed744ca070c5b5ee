use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthStateCallback, AuthStateListeners, IdentityProvider, Subscription};
use crate::model::Session;
use crate::storage::{SessionStore, StorageError};

/// Base URL of the Identity Toolkit REST API.
pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Per-request timeout so a dead network does not leave the form loading forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Token lifetime assumed when the response omits `expiresIn`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Error codes that mean the email/password pair was refused.
const INVALID_CREDENTIAL_CODES: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "USER_DISABLED",
];

/// Splits `"WEAK_PASSWORD : Password should be at least 6 characters"` into code and detail.
static ERROR_MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z0-9_]+)(?:\s*:\s*(.+))?$").expect("valid hardcoded regex")
});

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: String,
    id_token: String,
    refresh_token: String,
    /// Seconds until `id_token` expires, sent as a decimal string.
    expires_in: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_in = self
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Session {
            uid: self.local_id,
            email: self.email,
            email_verified: self.email_verified,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: now + chrono::Duration::seconds(expires_in),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity provider backed by the Identity Toolkit REST API.
///
/// The signed-in session is cached through a [`SessionStore`] so a restart
/// reports the same user to auth-state listeners, the way the hosted SDKs
/// persist their own sessions.
pub struct IdentityToolkitProvider {
    client: Client,
    api_key: String,
    base_url: String,
    store: SessionStore,
    listeners: AuthStateListeners,
}

impl IdentityToolkitProvider {
    /// Creates a provider for the project identified by `api_key`.
    ///
    /// Restores a cached session from `store` unless its token has expired.
    pub fn new(api_key: impl Into<String>, store: SessionStore) -> Result<Self, AuthError> {
        let cached = match store.load() {
            Ok(cached) => cached,
            Err(StorageError::Json(e)) => {
                tracing::warn!(error = %e, "cached session unreadable, discarding");
                store.clear()?;
                None
            }
            Err(e) => return Err(e.into()),
        };
        let session = match cached {
            Some(session) if session.is_expired(Utc::now()) => {
                tracing::info!(uid = %session.uid, "cached session expired, discarding");
                store.clear()?;
                None
            }
            other => other,
        };
        if let Some(session) = &session {
            tracing::info!(uid = %session.uid, "restored cached session");
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            store,
            listeners: AuthStateListeners::new(session),
        })
    }

    /// Points the provider at a different API root.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.base_url.trim_end_matches('/'))
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(
            method,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis(),
            "identity toolkit response"
        );
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(read_error(response).await)
        }
    }

    async fn password_request(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let token: TokenResponse = self.post(method, &request).await?;
        Ok(self.establish(token.into_session(Utc::now())))
    }

    /// Caches `session` and reports it to listeners.
    ///
    /// The account already exists server-side at this point, so a failed
    /// cache write only costs the restore on the next launch.
    fn establish(&self, session: Session) -> Session {
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(
                error = %e,
                path = %self.store.path().display(),
                "failed to cache session"
            );
        }
        self.listeners.publish(Some(session.clone()));
        session
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    fn on_auth_state_changed(&self, callback: AuthStateCallback) -> Subscription {
        self.listeners.subscribe(callback)
    }

    fn current_session(&self) -> Option<Session> {
        self.listeners.current()
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.password_request("signUp", email, password).await
    }

    async fn send_email_verification(&self, session: &Session) -> Result<(), AuthError> {
        let request = OobCodeRequest {
            request_type: "VERIFY_EMAIL",
            id_token: &session.id_token,
        };
        let _: serde_json::Value = self.post("sendOobCode", &request).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.password_request("signInWithPassword", email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // Sign-out is local: forget the tokens. Listeners hear about it even
        // if the cache file could not be removed.
        let cleared = self.store.clear();
        self.listeners.publish(None);
        cleared.map_err(AuthError::from)
    }
}

async fn read_error(response: Response) -> AuthError {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => map_error_message(&envelope.error.message),
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "unreadable error body");
            AuthError::Provider {
                code: status.as_str().to_string(),
                message: format!("unexpected response ({status})"),
            }
        }
    }
}

/// Maps an Identity Toolkit error message to an [`AuthError`].
fn map_error_message(raw: &str) -> AuthError {
    let raw = raw.trim();
    let (code, detail) = match ERROR_MESSAGE_RE.captures(raw) {
        Some(caps) => (
            caps.get(1).map_or(raw, |m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
        ),
        None => (raw, None),
    };
    match code {
        "EMAIL_EXISTS" => AuthError::AccountExists,
        c if INVALID_CREDENTIAL_CODES.contains(&c) => AuthError::InvalidCredentials,
        _ => AuthError::Provider {
            code: code.to_string(),
            message: detail.unwrap_or(raw).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    // --- map_error_message ---

    #[test]
    fn email_exists_is_account_exists() {
        assert!(matches!(
            map_error_message("EMAIL_EXISTS"),
            AuthError::AccountExists
        ));
    }

    #[test]
    fn credential_codes_are_invalid_credentials() {
        for code in INVALID_CREDENTIAL_CODES {
            assert!(
                matches!(map_error_message(code), AuthError::InvalidCredentials),
                "{code} should map to InvalidCredentials"
            );
        }
    }

    #[test]
    fn detail_becomes_message() {
        match map_error_message("WEAK_PASSWORD : Password should be at least 6 characters") {
            AuthError::Provider { code, message } => {
                assert_eq!(code, "WEAK_PASSWORD");
                assert_eq!(message, "Password should be at least 6 characters");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn bare_code_is_its_own_message() {
        match map_error_message("TOO_MANY_ATTEMPTS_TRY_LATER") {
            AuthError::Provider { code, message } => {
                assert_eq!(code, "TOO_MANY_ATTEMPTS_TRY_LATER");
                assert_eq!(message, "TOO_MANY_ATTEMPTS_TRY_LATER");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn free_text_message_kept_verbatim() {
        match map_error_message("API key not valid. Please pass a valid API key.") {
            AuthError::Provider { message, .. } => {
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    // --- TokenResponse ---

    #[test]
    fn token_response_into_session() {
        let json = r#"{
            "kind": "identitytoolkit#SignupNewUserResponse",
            "localId": "abc123",
            "email": "asha@iitd.ac.in",
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let session = token.into_session(now);
        assert_eq!(session.uid, "abc123");
        assert_eq!(session.email, "asha@iitd.ac.in");
        assert!(!session.email_verified);
        assert_eq!(
            session.expires_at,
            Utc.with_ymd_and_hms(2026, 10, 17, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_expires_in_uses_default() {
        let json = r#"{"localId":"a","email":"e@x.edu","idToken":"i","refreshToken":"r"}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let now = Utc::now();
        let session = token.into_session(now);
        assert_eq!(
            session.expires_at,
            now + chrono::Duration::seconds(DEFAULT_EXPIRES_IN_SECS)
        );
    }

    #[test]
    fn password_request_uses_camel_case() {
        let request = PasswordRequest {
            email: "a@b.edu",
            password: "pw",
            return_secure_token: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["returnSecureToken"], true);
        assert_eq!(json["email"], "a@b.edu");
    }

    // --- provider construction ---

    fn make_session(expires_at: DateTime<Utc>) -> Session {
        Session {
            uid: "cached".into(),
            email: "sam@mit.edu".into(),
            email_verified: true,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at,
        }
    }

    #[test]
    fn restores_cached_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        let session = make_session(Utc::now() + chrono::Duration::hours(1));
        store.save(&session).unwrap();

        let provider = IdentityToolkitProvider::new("key", store).unwrap();
        assert_eq!(provider.current_session(), Some(session));
    }

    #[test]
    fn discards_expired_cached_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        store
            .save(&make_session(Utc::now() - chrono::Duration::hours(1)))
            .unwrap();

        let provider = IdentityToolkitProvider::new("key", store.clone()).unwrap();
        assert_eq!(provider.current_session(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn discards_corrupt_cached_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "{truncated").unwrap();

        let provider = IdentityToolkitProvider::new("key", store.clone()).unwrap();
        assert_eq!(provider.current_session(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn unwritable_cache_still_signs_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        let provider = IdentityToolkitProvider::new("key", store.clone()).unwrap();
        std::fs::create_dir_all(store.path()).unwrap();

        let session = make_session(Utc::now() + chrono::Duration::hours(1));
        let established = provider.establish(session.clone());
        assert_eq!(established, session);
        assert_eq!(provider.current_session(), Some(session));
        assert!(store.path().is_dir());
    }

    #[test]
    fn establish_caches_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        let provider = IdentityToolkitProvider::new("key", store.clone()).unwrap();

        let session = make_session(Utc::now() + chrono::Duration::hours(1));
        provider.establish(session.clone());
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let provider = IdentityToolkitProvider::new("key", SessionStore::in_dir(dir.path()))
            .unwrap()
            .with_base_url("http://localhost:9099/identitytoolkit.googleapis.com/v1/");
        assert_eq!(
            provider.endpoint("signUp"),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
    }

    #[tokio::test]
    async fn sign_out_clears_cache_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        store
            .save(&make_session(Utc::now() + chrono::Duration::hours(1)))
            .unwrap();
        let provider = IdentityToolkitProvider::new("key", store.clone()).unwrap();

        provider.sign_out().await.unwrap();
        assert_eq!(provider.current_session(), None);
        assert_eq!(store.load().unwrap(), None);
    }
}
