use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{AuthError, AuthStateCallback, AuthStateListeners, IdentityProvider, Subscription};
use crate::model::Session;

/// Lifetime of the tokens this provider hands out.
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
    email_verified: bool,
}

/// A canned provider failure returned by the next call of one kind.
#[derive(Debug, Clone)]
struct InjectedFailure {
    code: String,
    message: String,
}

impl InjectedFailure {
    fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Identity provider that keeps accounts in memory.
///
/// Backs the test suite and the `--offline` demo mode. Verification emails
/// are not sent; their recipients are recorded in an outbox instead.
#[derive(Default)]
pub struct InMemoryProvider {
    accounts: Mutex<HashMap<String, Account>>,
    outbox: Mutex<Vec<String>>,
    create_failure: Mutex<Option<InjectedFailure>>,
    verification_failure: Mutex<Option<InjectedFailure>>,
    sign_out_failure: Mutex<Option<InjectedFailure>>,
    listeners: AuthStateListeners,
    next_uid: AtomicU64,
    latency: Option<Duration>,
}

impl InMemoryProvider {
    /// Creates a provider with no accounts and nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        let uid = self.allocate_uid();
        lock(&self.accounts).insert(
            email.to_string(),
            Account {
                uid,
                password: password.to_string(),
                email_verified: true,
            },
        );
        self
    }

    /// Delays every request by `latency`, to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Starts with `email` signed in. The account must already exist.
    pub fn signed_in_as(self, email: &str) -> Self {
        let session = lock(&self.accounts)
            .get(email)
            .map(|account| make_session(email, account));
        self.listeners.publish(session);
        self
    }

    /// Makes the next `create_user` call fail with the given provider error.
    pub fn fail_next_create(&self, code: &str, message: &str) {
        *lock(&self.create_failure) = Some(InjectedFailure::new(code, message));
    }

    /// Makes the next `send_email_verification` call fail. Nothing is
    /// added to the outbox.
    pub fn fail_next_verification(&self, code: &str, message: &str) {
        *lock(&self.verification_failure) = Some(InjectedFailure::new(code, message));
    }

    /// Makes the next `sign_out` call fail. The session stays signed in.
    pub fn fail_next_sign_out(&self, code: &str, message: &str) {
        *lock(&self.sign_out_failure) = Some(InjectedFailure::new(code, message));
    }

    /// Returns the addresses verification emails were requested for, oldest first.
    pub fn verification_outbox(&self) -> Vec<String> {
        lock(&self.outbox).clone()
    }

    /// Returns `true` if an account exists for `email`.
    pub fn has_account(&self, email: &str) -> bool {
        lock(&self.accounts).contains_key(email)
    }

    /// Returns the number of live auth-state subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    fn allocate_uid(&self) -> String {
        let n = self.next_uid.fetch_add(1, Ordering::Relaxed);
        format!("local-{n:04}")
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryProvider {
    fn on_auth_state_changed(&self, callback: AuthStateCallback) -> Subscription {
        self.listeners.subscribe(callback)
    }

    fn current_session(&self) -> Option<Session> {
        self.listeners.current()
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.simulate_latency().await;
        take_failure(&self.create_failure)?;
        let session = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(email) {
                return Err(AuthError::AccountExists);
            }
            let account = Account {
                uid: self.allocate_uid(),
                password: password.to_string(),
                email_verified: false,
            };
            let session = make_session(email, &account);
            accounts.insert(email.to_string(), account);
            session
        };
        self.listeners.publish(Some(session.clone()));
        Ok(session)
    }

    async fn send_email_verification(&self, session: &Session) -> Result<(), AuthError> {
        self.simulate_latency().await;
        take_failure(&self.verification_failure)?;
        lock(&self.outbox).push(session.email.clone());
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.simulate_latency().await;
        let session = match lock(&self.accounts).get(email) {
            Some(account) if account.password == password => make_session(email, account),
            _ => return Err(AuthError::InvalidCredentials),
        };
        self.listeners.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        take_failure(&self.sign_out_failure)?;
        self.listeners.publish(None);
        Ok(())
    }
}

fn make_session(email: &str, account: &Account) -> Session {
    Session {
        uid: account.uid.clone(),
        email: email.to_string(),
        email_verified: account.email_verified,
        id_token: format!("local-id-{}", account.uid),
        refresh_token: format!("local-refresh-{}", account.uid),
        expires_at: Utc::now() + chrono::Duration::seconds(TOKEN_LIFETIME_SECS),
    }
}

fn take_failure(slot: &Mutex<Option<InjectedFailure>>) -> Result<(), AuthError> {
    match lock(slot).take() {
        Some(failure) => Err(AuthError::Provider {
            code: failure.code,
            message: failure.message,
        }),
        None => Ok(()),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
