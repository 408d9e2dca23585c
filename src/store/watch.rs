use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use super::KeyValue;
use crate::error::Result;

/// Emitted to subscribers when a storage key is written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
}

/// Wraps a store and notifies subscribers of every write, so views can
/// refresh on change instead of re-reading the store on a timer. Reads
/// pass straight through. Only in-process writes are observable; another
/// process writing the same backing store goes unseen.
pub struct WatchedStore<S> {
    inner: S,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl<S> WatchedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to change events. Dropping the receiver unsubscribes;
    /// the sender is pruned on the next notification.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .expect("subscriber list poisoned")
            .push(tx);
        rx
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn notify(&self, key: &str) {
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        subscribers.retain(|tx| {
            tx.send(StoreEvent {
                key: key.to_string(),
            })
            .is_ok()
        });
    }
}

impl<S: KeyValue> KeyValue for WatchedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)?;
        self.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)?;
        self.notify(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn subscribers_see_writes_and_removes() {
        let store = WatchedStore::new(MemoryStore::new());
        let events = store.subscribe();

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        assert_eq!(events.recv().unwrap().key, "a");
        assert_eq!(events.recv().unwrap().key, "b");
        assert_eq!(events.recv().unwrap().key, "a");
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn reads_do_not_notify() {
        let store = WatchedStore::new(MemoryStore::new());
        store.set("a", "1").unwrap();
        let events = store.subscribe();
        let _ = store.get("a").unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let store = WatchedStore::new(MemoryStore::new());
        let first = store.subscribe();
        drop(first);
        let second = store.subscribe();

        store.set("a", "1").unwrap();
        assert_eq!(second.recv().unwrap().key, "a");
        assert_eq!(
            store.subscribers.lock().unwrap().len(),
            1,
            "dead subscriber should have been pruned"
        );
    }
}
