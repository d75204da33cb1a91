use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ListenerList<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

fn lock<T>(list: &Mutex<ListenerList<T>>) -> MutexGuard<'_, ListenerList<T>> {
    list.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Typed change-listener registry.
///
/// Listeners run synchronously on the notifying task, outside the registry
/// lock, so a listener may subscribe or unsubscribe without deadlocking.
pub struct Subscribers<T> {
    list: Arc<Mutex<ListenerList<T>>>,
}

impl<T: 'static> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            list: Arc::new(Mutex::new(ListenerList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut list = lock(&self.list);
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<ListenerList<T>>> = Arc::downgrade(&self.list);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(list) = weak.upgrade() {
                    lock(&list).entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = lock(&self.list)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.list).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`Subscribers::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_reaches_every_listener() {
        let subscribers: Subscribers<u32> = Subscribers::new();
        let total = Arc::new(AtomicUsize::new(0));

        let a = Arc::clone(&total);
        let _first = subscribers.subscribe(move |v| {
            a.fetch_add(*v as usize, Ordering::SeqCst);
        });
        let b = Arc::clone(&total);
        let _second = subscribers.subscribe(move |v| {
            b.fetch_add(*v as usize, Ordering::SeqCst);
        });

        subscribers.notify(&5);
        assert_eq!(total.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let subscribers: Subscribers<()> = Subscribers::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        let subscription = subscribers.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        subscribers.notify(&());
        subscription.unsubscribe();
        subscribers.notify(&());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped_is_noop() {
        let subscribers: Subscribers<()> = Subscribers::new();
        let subscription = subscribers.subscribe(|_| {});
        drop(subscribers);
        subscription.unsubscribe();
    }
}
