//! Per-key mutual exclusion for the attendance check-then-insert.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`. Calls for different keys
    /// do not block each other.
    pub fn with_lock<T>(&self, key: &K, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        // Declared first, dropped last: the key guard is released before
        // the entry is looked at, also when `f` unwinds.
        let release = Release {
            slots: &self.slots,
            key,
            slot,
        };
        let _guard = lock(&release.slot);
        f()
    }

    /// Keys currently tracked (held or waited on).
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Release<'a, K: Eq + Hash> {
    slots: &'a Mutex<HashMap<K, Arc<Mutex<()>>>>,
    key: &'a K,
    slot: Arc<Mutex<()>>,
}

impl<K: Eq + Hash> Drop for Release<'_, K> {
    /// Drop the entry once nobody else holds or waits on it.
    fn drop(&mut self) {
        let mut slots = lock(self.slots);
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(self.key);
        }
    }
}

/// The guarded data is `()` or a map that is never left half-updated, so a
/// poisoned mutex is safe to keep using.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::<String>::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    locks.with_lock(&"k".to_string(), || {
                        let n = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(n, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(5));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn panicking_closure_releases_its_entry() {
        let locks = KeyedLocks::<String>::new();
        let key = "ALICE".to_string();

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: i32 = locks.with_lock(&key, || panic!("boom"));
        }));
        assert!(res.is_err());
        assert!(locks.is_empty());

        assert_eq!(locks.with_lock(&key, || 7), 7);
        assert!(locks.is_empty());
    }

    #[test]
    fn entries_are_released() {
        let locks = KeyedLocks::<(String, String)>::new();
        let key = ("ALICE".to_string(), "2024-01-01".to_string());
        let v = locks.with_lock(&key, || {
            assert_eq!(locks.len(), 1);
            42
        });
        assert_eq!(v, 42);
        assert!(locks.is_empty());
    }
}
