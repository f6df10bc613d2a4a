//! Expiration List Module
//!
//! Time-bucketed index of item expirations. Items are grouped by their
//! expiration second, so a sweep only walks the buckets that are already due
//! instead of every tracked item.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Eviction action invoked for each expired item during background sweeps.
pub type GcCallback = Arc<dyn Fn(i64) + Send + Sync + 'static>;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
struct ListInner {
    /// item id -> expiration time
    items: HashMap<i64, i64>,
    /// expiration time -> item ids due at that time
    buckets: BTreeMap<i64, HashSet<i64>>,
}

impl ListInner {
    fn unlink(&mut self, item_id: i64, expires_at: i64) {
        if let Some(bucket) = self.buckets.get_mut(&expires_at) {
            bucket.remove(&item_id);
            if bucket.is_empty() {
                self.buckets.remove(&expires_at);
            }
        }
    }
}

// == Expires List ==
/// Independently locked expiration index for one store or shard.
pub struct ExpiresList {
    id: u64,
    inner: Mutex<ListInner>,
    gc_callback: Mutex<Option<GcCallback>>,
}

impl ExpiresList {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            inner: Mutex::new(ListInner::default()),
            gc_callback: Mutex::new(None),
        }
    }

    /// Process-unique identifier, used by the GC manager to deduplicate registrations.
    pub fn id(&self) -> u64 {
        self.id
    }

    // == Add ==
    /// Inserts an item or moves it to a new expiration time.
    pub fn add(&self, item_id: i64, expires_at: i64) {
        let mut inner = self.inner.lock();

        if let Some(old) = inner.items.insert(item_id, expires_at) {
            if old == expires_at {
                return;
            }
            inner.unlink(item_id, old);
        }

        inner.buckets.entry(expires_at).or_default().insert(item_id);
    }

    // == Remove ==
    /// Forgets an item. Unknown ids are ignored.
    pub fn remove(&self, item_id: i64) {
        let mut inner = self.inner.lock();
        if let Some(expires_at) = inner.items.remove(&item_id) {
            inner.unlink(item_id, expires_at);
        }
    }

    // == GC ==
    /// Removes every item with `expires_at <= now` and calls `callback` once
    /// per removed id. Returns the number of items removed.
    ///
    /// The list lock is released before callbacks run, so a callback may add
    /// to or remove from this list.
    pub fn gc<F>(&self, now: i64, mut callback: F) -> usize
    where
        F: FnMut(i64),
    {
        let expired = {
            let mut inner = self.inner.lock();
            let mut expired = Vec::new();

            while let Some(bucket) = inner.buckets.first_entry() {
                if *bucket.key() > now {
                    break;
                }
                let ids = bucket.remove();
                for id in ids {
                    inner.items.remove(&id);
                    expired.push(id);
                }
            }

            expired
        };

        for id in &expired {
            callback(*id);
        }
        expired.len()
    }

    // == On GC ==
    /// Sets the eviction action used by [`ExpiresList::sweep`].
    pub fn on_gc<F>(&self, callback: F)
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        *self.gc_callback.lock() = Some(Arc::new(callback));
    }

    // == Sweep ==
    /// Background sweep: [`ExpiresList::gc`] with the registered callback.
    /// Expired items are still dropped when no callback is registered.
    pub fn sweep(&self, now: i64) -> usize {
        let callback = self.gc_callback.lock().clone();
        match callback {
            Some(callback) => self.gc(now, |id| callback(id)),
            None => self.gc(now, |_| {}),
        }
    }

    /// Expiration time currently recorded for an item.
    pub fn expires_at(&self, item_id: i64) -> Option<i64> {
        self.inner.lock().items.get(&item_id).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Number of distinct expiration buckets.
    pub fn bucket_count(&self) -> usize {
        self.inner.lock().buckets.len()
    }
}

impl Default for ExpiresList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpiresList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ExpiresList")
            .field("id", &self.id)
            .field("items", &inner.items.len())
            .field("buckets", &inner.buckets.len())
            .finish()
    }
}
