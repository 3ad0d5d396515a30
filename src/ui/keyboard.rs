//! Keyboard-show notifications.
//!
//! The host posts a [`KeyboardInfo`] whenever the on-screen keyboard (or
//! whatever bottom panel plays its role) is about to appear. Alerts that
//! need to dodge it hold a [`KeyboardSubscription`]; dropping the
//! subscription unregisters it, so a subscription's lifetime can be tied to
//! the alert's and a leaked registration is impossible by construction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Frame data carried by a keyboard-show notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardInfo {
    /// Height of the keyboard, in rows.
    pub height: u16,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: HashMap<u64, UnboundedSender<KeyboardInfo>>,
}

/// Registry of keyboard-show observers.
///
/// Cloning shares the registry; the host keeps one end and posts into it,
/// each interested alert keeps a subscription.
#[derive(Clone, Default)]
pub struct KeyboardNotifier {
    inner: Arc<Mutex<Registry>>,
}

impl KeyboardNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. The registration lives exactly as long as the
    /// returned handle.
    #[must_use]
    pub fn subscribe(&self) -> KeyboardSubscription {
        let (tx, rx) = unbounded_channel();
        let mut registry = self.inner.lock().expect("keyboard registry poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.observers.insert(id, tx);
        debug!(id, "registered keyboard observer");
        KeyboardSubscription {
            id,
            registry: Arc::downgrade(&self.inner),
            rx,
        }
    }

    /// Deliver a keyboard-show notification to every live observer.
    pub fn post(&self, info: KeyboardInfo) {
        let registry = self.inner.lock().expect("keyboard registry poisoned");
        for tx in registry.observers.values() {
            // A send failure means the receiver is mid-drop; the drop will
            // remove the entry.
            let _ = tx.send(info);
        }
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner
            .lock()
            .expect("keyboard registry poisoned")
            .observers
            .len()
    }
}

/// Disposable observer handle returned by [`KeyboardNotifier::subscribe`].
pub struct KeyboardSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    rx: UnboundedReceiver<KeyboardInfo>,
}

impl KeyboardSubscription {
    /// Drain the most recent pending notification, if any.
    ///
    /// Notifications posted in quick succession coalesce to the latest one.
    pub fn try_recv(&mut self) -> Option<KeyboardInfo> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(info) => latest = Some(info),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                registry.observers.remove(&self.id);
                debug!(id = self.id, "removed keyboard observer");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_registers_exactly_one_observer() {
        let notifier = KeyboardNotifier::new();
        assert_eq!(notifier.observer_count(), 0);
        let sub = notifier.subscribe();
        assert_eq!(notifier.observer_count(), 1);
        drop(sub);
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn post_reaches_live_subscriptions() {
        let notifier = KeyboardNotifier::new();
        let mut sub = notifier.subscribe();
        notifier.post(KeyboardInfo { height: 9 });
        assert_eq!(sub.try_recv(), Some(KeyboardInfo { height: 9 }));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn rapid_posts_coalesce_to_latest() {
        let notifier = KeyboardNotifier::new();
        let mut sub = notifier.subscribe();
        notifier.post(KeyboardInfo { height: 5 });
        notifier.post(KeyboardInfo { height: 12 });
        assert_eq!(sub.try_recv(), Some(KeyboardInfo { height: 12 }));
    }

    #[test]
    fn post_after_unsubscribe_is_a_no_op() {
        let notifier = KeyboardNotifier::new();
        drop(notifier.subscribe());
        notifier.post(KeyboardInfo { height: 3 });
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn notifier_outlived_by_subscription_does_not_crash() {
        let notifier = KeyboardNotifier::new();
        let sub = notifier.subscribe();
        drop(notifier);
        drop(sub);
    }
}
