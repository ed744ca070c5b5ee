use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::model::Session;

/// Callback invoked with the current session whenever auth state changes.
pub type AuthStateCallback = Box<dyn Fn(Option<Session>) + Send + Sync>;

type SharedCallback = Arc<dyn Fn(Option<Session>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    next_id: u64,
    callbacks: Vec<(u64, SharedCallback)>,
}

/// Registry of auth-state callbacks plus the session they observe.
///
/// Provider implementations own one of these and call
/// [`publish`](Self::publish) whenever they sign a user in or out.
/// Callbacks run on the publishing task, outside the registry lock.
#[derive(Clone, Default)]
pub struct AuthStateListeners {
    inner: Arc<Mutex<Inner>>,
}

impl AuthStateListeners {
    /// Creates a registry whose current session is `initial`.
    pub fn new(initial: Option<Session>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                session: initial,
                ..Inner::default()
            })),
        }
    }

    /// Registers `callback` and immediately invokes it with the current session.
    ///
    /// The callback stays registered until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: AuthStateCallback) -> Subscription {
        let callback: SharedCallback = Arc::from(callback);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.callbacks.push((id, Arc::clone(&callback)));
            (id, inner.session.clone())
        };
        callback(current);
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Replaces the current session and notifies every registered callback.
    pub fn publish(&self, session: Option<Session>) {
        let callbacks: Vec<SharedCallback> = {
            let mut inner = self.lock();
            inner.session = session.clone();
            inner.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback(session.clone());
        }
    }

    /// Returns the current session.
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Returns the number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.lock().callbacks.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for a registered auth-state callback; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn make_session(uid: &str) -> Session {
        Session {
            uid: uid.into(),
            email: format!("{uid}@iitd.ac.in"),
            email_verified: false,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now(),
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<Option<String>>>>, AuthStateCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: AuthStateCallback = Box::new(move |session: Option<Session>| {
            sink.lock().unwrap().push(session.map(|s| s.uid));
        });
        (seen, callback)
    }

    #[test]
    fn subscribe_fires_immediately_with_absent_session() {
        let listeners = AuthStateListeners::default();
        let (seen, callback) = recorder();
        let _sub = listeners.subscribe(callback);
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[test]
    fn subscribe_fires_immediately_with_present_session() {
        let listeners = AuthStateListeners::new(Some(make_session("a")));
        let (seen, callback) = recorder();
        let _sub = listeners.subscribe(callback);
        assert_eq!(*seen.lock().unwrap(), vec![Some("a".to_string())]);
    }

    #[test]
    fn publish_notifies_in_order() {
        let listeners = AuthStateListeners::default();
        let (seen, callback) = recorder();
        let _sub = listeners.subscribe(callback);
        listeners.publish(Some(make_session("a")));
        listeners.publish(None);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("a".to_string()), None]
        );
        assert_eq!(listeners.current(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let listeners = AuthStateListeners::default();
        let (seen, callback) = recorder();
        let sub = listeners.subscribe(callback);
        assert_eq!(listeners.listener_count(), 1);
        drop(sub);
        assert_eq!(listeners.listener_count(), 0);
        listeners.publish(Some(make_session("a")));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn subscription_outliving_registry_drops_cleanly() {
        let listeners = AuthStateListeners::default();
        let (_seen, callback) = recorder();
        let sub = listeners.subscribe(callback);
        drop(listeners);
        drop(sub);
    }

    #[test]
    fn callback_may_read_registry_while_notified() {
        let listeners = AuthStateListeners::default();
        let reader = listeners.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = listeners.subscribe(Box::new(move |_| {
            sink.lock().unwrap().push(reader.current().is_some());
        }));
        listeners.publish(Some(make_session("a")));
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }
}
