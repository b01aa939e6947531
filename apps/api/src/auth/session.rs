//! Explicit session context shared with the components that need the signed-in user.
//!
//! A `SessionContext` holds the current session and fans changes out to
//! subscribers. Subscribing returns an `AuthSubscription` guard; dropping the
//! guard is the unsubscribe, so a component's subscription lives exactly as
//! long as the component.

use tokio::sync::watch;
use tracing::debug;

use crate::auth::Session;

pub struct SessionContext {
    tx: watch::Sender<Option<Session>>,
}

impl SessionContext {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current session. Subscribers are only woken on an actual change.
    pub fn publish(&self, session: Option<Session>) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
        if changed {
            debug!("Session changed; {} subscriber(s)", self.tx.receiver_count());
        }
    }

    pub fn subscribe(&self, subscriber: impl Into<String>) -> AuthSubscription {
        let subscriber = subscriber.into();
        debug!("{subscriber} subscribed to session changes");
        AuthSubscription {
            rx: self.tx.subscribe(),
            subscriber,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Scoped subscription to a `SessionContext`. Unsubscribes on drop.
pub struct AuthSubscription {
    rx: watch::Receiver<Option<Session>>,
    subscriber: String,
}

impl AuthSubscription {
    /// The session published since the last call, if it changed.
    ///
    /// Only a change notification: callers authorize with the session of
    /// their own request, never with whatever was published last.
    pub fn take_change(&mut self) -> Option<Option<Session>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        debug!("{} unsubscribed from session changes", self.subscriber);
    }
}
