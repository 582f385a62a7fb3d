//! One-to-many change notification
//!
//! An [`Observable`] is a cheap, cloneable handle onto a shared subscriber
//! registry. Subscribers are kept in a map keyed by [`SubscriptionId`];
//! ids grow monotonically, so iterating the map yields subscription order.
//!
//! `notify` snapshots the registry before dispatching and releases the
//! lock while callbacks run, so callbacks may subscribe or unsubscribe
//! (themselves or others) freely. A callback added during a pass is not
//! part of that pass; a callback removed during a pass is skipped if it
//! has not been reached yet.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Identity of a single subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    subscribers: BTreeMap<SubscriptionId, Callback<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: BTreeMap::new(),
        }
    }
}

/// Shared subject that broadcasts values to its subscribers
pub struct Observable<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Registers `callback` and returns the id needed to remove it again
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.insert(id, Arc::new(callback));
        id
    }

    /// Like [`Observable::subscribe`], but the subscription ends when the
    /// returned guard is dropped
    pub fn subscribe_scoped<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.subscribe(callback);
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Removes a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_subscriber(&self.inner, id)
    }

    /// Invokes every current subscriber with `value` on the calling thread
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(SubscriptionId, Callback<T>)> = match self.inner.lock() {
            Ok(registry) => registry
                .subscribers
                .iter()
                .map(|(id, callback)| (*id, Arc::clone(callback)))
                .collect(),
            Err(_) => return,
        };

        for (id, callback) in snapshot {
            if self.is_subscribed(id) {
                callback(value);
            }
        }
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner
            .lock()
            .map(|registry| registry.subscribers.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|registry| registry.subscribers.len())
            .unwrap_or(0)
    }
}

fn remove_subscriber<T>(registry: &Mutex<Registry<T>>, id: SubscriptionId) -> bool {
    match registry.lock() {
        Ok(mut registry) => registry.subscribers.remove(&id).is_some(),
        Err(poisoned) => poisoned.into_inner().subscribers.remove(&id).is_some(),
    }
}

/// Guard returned by [`Observable::subscribe_scoped`]
pub struct Subscription<T> {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_subscriber(&registry, self.id);
        }
    }
}
