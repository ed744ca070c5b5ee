use tokio::sync::mpsc::UnboundedSender;

use super::state::Event;
use crate::auth::{IdentityProvider, Subscription};

/// Forwards identity-provider auth-state changes onto the app's event queue.
///
/// Every notification becomes an [`Event::SessionChanged`]. The provider
/// fires once on attach with the current session. Dropping the observer
/// unsubscribes.
pub struct SessionObserver {
    _subscription: Subscription,
}

impl SessionObserver {
    /// Subscribes to `provider` and posts every notification to `events`.
    pub fn attach(provider: &dyn IdentityProvider, events: UnboundedSender<Event>) -> Self {
        let subscription = provider.on_auth_state_changed(Box::new(move |session| {
            tracing::debug!(present = session.is_some(), "auth state changed");
            if events.send(Event::SessionChanged(session)).is_err() {
                tracing::debug!("event queue closed, dropping auth state change");
            }
        }));
        Self {
            _subscription: subscription,
        }
    }
}
