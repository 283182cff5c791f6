//! Session change notifications.
//!
//! Handlers publish a [`SessionEvent`] whenever an admin signs in, signs out,
//! or has their access token refreshed. Listeners subscribe at startup and
//! stay registered for as long as the returned [`Subscription`] lives.
//! Delivery is synchronous, on the publishing task, in subscription order.

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A change to an admin's remote auth session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { email: String },
    SignedOut { email: Option<String> },
    TokenRefreshed { email: String },
}

impl SessionEvent {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SignedIn { .. } => "signed_in",
            Self::SignedOut { .. } => "signed_out",
            Self::TokenRefreshed { .. } => "token_refreshed",
        }
    }
}

/// Receives session events.
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: &SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(&SessionEvent) + Send + Sync,
{
    fn on_session_event(&self, event: &SessionEvent) {
        self(event);
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn SessionListener>)>,
}

/// Registry of session listeners.
#[derive(Clone, Default)]
pub struct SessionEvents {
    inner: Arc<Mutex<Listeners>>,
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It is removed when the returned guard is dropped.
    pub fn subscribe(&self, listener: impl SessionListener + 'static) -> Subscription {
        let mut listeners = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current listener.
    pub fn publish(&self, event: &SessionEvent) {
        // Snapshot under the lock so listeners may subscribe or unsubscribe.
        let listeners: Vec<Arc<dyn SessionListener>> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener.on_session_event(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Logs every transition and keeps the Sentry user scope in step.
pub fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::SignedIn { email } => {
            tracing::info!(email = %email, "Admin signed in");
            crate::error::set_sentry_user(email);
        }
        SessionEvent::TokenRefreshed { email } => {
            tracing::info!(email = %email, "Admin session refreshed");
        }
        SessionEvent::SignedOut { email } => {
            tracing::info!(email = ?email, "Admin signed out");
            crate::error::clear_sentry_user();
        }
    }
}
