//! Memory Store Module
//!
//! Fingerprint-indexed container of committed cache entries. Entries only
//! enter the store through [`MemoryWriter::close`]; the store tracks their
//! expirations in its own [`ExpiresList`] and forwards dirty keys to an
//! optional parent tier.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::fingerprint::fingerprint;
use crate::cache::ignore::FixedSet;
use crate::cache::once::EndFn;
use crate::cache::{unix_time, CacheEntry, CacheStats, MemoryWriter};
use crate::error::{CacheError, Result};
use crate::expires::ExpiresList;

// == Parent Store ==
/// Next cache tier receiving committed dirty entries.
pub trait ParentStore: Send + Sync {
    /// Called from the flush task for each dirty key still present in the store.
    fn accept_dirty(&self, key: &str, entry: Arc<CacheEntry>);
}

// == Store Options ==
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Total committed bytes allowed, 0 = unlimited
    pub memory_capacity_bytes: u64,
    /// Bounded size of the dirty-key queue
    pub dirty_queue_size: usize,
    /// Maximum number of ignored keys remembered
    pub ignore_set_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            memory_capacity_bytes: 0,
            dirty_queue_size: 4096,
            ignore_set_capacity: 32768,
        }
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    values: HashMap<u64, Arc<CacheEntry>>,
    used_bytes: u64,
    stats: CacheStats,
}

impl StoreInner {
    fn insert(&mut self, hash: u64, entry: Arc<CacheEntry>) {
        self.used_bytes += entry.size();
        if let Some(old) = self.values.insert(hash, entry) {
            self.used_bytes = self.used_bytes.saturating_sub(old.size());
        }
    }

    fn remove(&mut self, hash: u64) -> Option<Arc<CacheEntry>> {
        let old = self.values.remove(&hash)?;
        self.used_bytes = self.used_bytes.saturating_sub(old.size());
        Some(old)
    }
}

// == Memory Store ==
/// In-memory cache tier.
pub struct MemoryStore {
    options: StoreOptions,
    /// Committed entries, keyed by fingerprint
    inner: Mutex<StoreInner>,
    /// Keys rejected for caching after an oversize write
    ignore_keys: Mutex<FixedSet>,
    /// Keys with an open writer
    writing_keys: Mutex<HashSet<String>>,
    list: Arc<ExpiresList>,
    parent: Option<Arc<dyn ParentStore>>,
    dirty_tx: Option<mpsc::Sender<String>>,
    dirty_rx: Mutex<Option<mpsc::Receiver<String>>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store without a parent tier.
    pub fn new(options: StoreOptions) -> Arc<Self> {
        Self::with_parent(options, None)
    }

    /// Creates a store that notifies `parent` of committed dirty entries.
    ///
    /// The store's expiration list is wired to evict from this store; register
    /// it with a [`crate::expires::GcManager`] to enable background expiry.
    pub fn with_parent(options: StoreOptions, parent: Option<Arc<dyn ParentStore>>) -> Arc<Self> {
        let (dirty_tx, dirty_rx) = match &parent {
            Some(_) => {
                let (tx, rx) = mpsc::channel(options.dirty_queue_size.max(1));
                (Some(tx), Some(rx))
            }
            None => (None, None),
        };

        Arc::new_cyclic(|weak: &Weak<Self>| {
            let list = Arc::new(ExpiresList::new());
            let store = weak.clone();
            list.on_gc(move |item_id| {
                if let Some(store) = store.upgrade() {
                    store.evict_expired(item_id as u64);
                }
            });

            Self {
                ignore_keys: Mutex::new(FixedSet::new(options.ignore_set_capacity)),
                options,
                inner: Mutex::new(StoreInner::default()),
                writing_keys: Mutex::new(HashSet::new()),
                list,
                parent,
                dirty_tx,
                dirty_rx: Mutex::new(dirty_rx),
            }
        })
    }

    // == Open Writer ==
    /// Starts a write transaction for `key`.
    ///
    /// `max_size` limits the body in bytes, 0 = unlimited. Nothing is visible
    /// to readers until the writer is closed.
    pub fn open_writer(
        self: &Arc<Self>,
        key: &str,
        expires_at: i64,
        status: i32,
        is_dirty: bool,
        max_size: u64,
    ) -> Result<MemoryWriter> {
        self.open_writer_with(key, expires_at, status, is_dirty, max_size, || {})
    }

    /// Like [`MemoryStore::open_writer`], also running `on_end` exactly once
    /// when the writer is closed, discarded or dropped.
    pub fn open_writer_with<F>(
        self: &Arc<Self>,
        key: &str,
        expires_at: i64,
        status: i32,
        is_dirty: bool,
        max_size: u64,
        on_end: F,
    ) -> Result<MemoryWriter>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_ignored(key) {
            return Err(CacheError::EntityTooLarge(key.to_string()));
        }

        let capacity = self.options.memory_capacity_bytes;
        if capacity > 0 && self.inner.lock().used_bytes >= capacity {
            return Err(CacheError::NotEnoughSpace(format!(
                "memory store is full ({} bytes)",
                capacity
            )));
        }

        if !self.writing_keys.lock().insert(key.to_string()) {
            return Err(CacheError::KeyIsWriting(key.to_string()));
        }

        let store = Arc::downgrade(self);
        let writing_key = key.to_string();
        let end_fn: EndFn = Box::new(move || {
            if let Some(store) = store.upgrade() {
                store.writing_keys.lock().remove(&writing_key);
            }
            on_end();
        });

        Ok(MemoryWriter::new(
            self.clone(),
            key,
            expires_at,
            status,
            is_dirty,
            max_size,
            end_fn,
        ))
    }

    // == Lookup ==
    /// Returns the committed, unexpired entry for `key`.
    pub fn lookup(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let hash = fingerprint(key);
        let now = unix_time();

        let mut inner = self.inner.lock();
        let found = inner
            .values
            .get(&hash)
            .filter(|entry| entry.is_done && !entry.is_expired_at(now))
            .cloned();

        match found {
            Some(entry) => {
                inner.stats.record_hit();
                Some(entry)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Ignore ==
    /// Excludes `key` from future writers.
    pub fn ignore_key(&self, key: &str) {
        self.ignore_keys.lock().push(key);
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_keys.lock().contains(key)
    }

    pub fn is_writing(&self, key: &str) -> bool {
        self.writing_keys.lock().contains(key)
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns false if nothing was stored.
    pub fn delete(&self, key: &str) -> bool {
        self.remove_fingerprint(fingerprint(key))
    }

    /// Removes the entry stored under `hash`.
    pub fn remove_fingerprint(&self, hash: u64) -> bool {
        // Both under the store lock, or a concurrent commit loses its expiry
        let mut inner = self.inner.lock();
        let removed = inner.remove(hash).is_some();
        self.list.remove(hash as i64);
        removed
    }

    // == Accessors ==
    /// Expiration list tracking this store's entries.
    pub fn expires_list(&self) -> Arc<ExpiresList> {
        self.list.clone()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.values.len();
        stats.used_bytes = inner.used_bytes;
        stats
    }

    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }

    // == Flush ==
    /// Spawns the worker forwarding dirty entries to the parent store.
    ///
    /// Returns `None` without a parent, or if the worker was already started.
    pub fn spawn_flush_task(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let parent = self.parent.clone()?;
        let mut rx = self.dirty_rx.lock().take()?;
        let store = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            info!("Starting dirty flush task");

            while let Some(key) = rx.recv().await {
                let Some(owner) = store.upgrade() else {
                    break;
                };

                let entry = owner.inner.lock().values.get(&fingerprint(&key)).cloned();
                match entry {
                    Some(entry) if entry.is_done => parent.accept_dirty(&key, entry),
                    _ => debug!(key = %key, "dirty key no longer cached, skipping"),
                }
            }

            debug!("Dirty flush task stopped");
        }))
    }

    // == Writer Hooks ==
    /// Publishes a finished entry and queues its key for the parent tier.
    ///
    /// Capacity is checked again here: writers opened concurrently while the
    /// store was just under its limit must not push it past the limit.
    pub(crate) fn commit(
        &self,
        key: &str,
        hash: u64,
        mut entry: CacheEntry,
        is_dirty: bool,
    ) -> Result<()> {
        let mut inner = self.inner.lock();

        let capacity = self.options.memory_capacity_bytes;
        if capacity > 0 {
            let replaced = inner.values.get(&hash).map_or(0, |old| old.size());
            let projected = inner.used_bytes.saturating_sub(replaced) + entry.size();
            if projected > capacity {
                return Err(CacheError::NotEnoughSpace(format!(
                    "committing {} would exceed {} bytes",
                    key, capacity
                )));
            }
        }

        entry.is_done = true;
        let expires_at = entry.expires_at;
        inner.insert(hash, Arc::new(entry));
        self.list.add(hash as i64, expires_at);

        if is_dirty {
            if let Some(tx) = &self.dirty_tx {
                // Full queue: drop the notification rather than block the writer
                if tx.try_send(key.to_string()).is_err() {
                    inner.stats.record_dirty_dropped();
                }
            }
        }

        Ok(())
    }

    /// Removes whatever is stored under `hash` so a discarded write cannot
    /// leave an older value behind.
    pub(crate) fn discard(&self, hash: u64) {
        let mut inner = self.inner.lock();
        inner.remove(hash);
        self.list.remove(hash as i64);
    }

    /// Oversize write: ignore the key from now on.
    pub(crate) fn reject_oversize(&self, key: &str) {
        self.ignore_key(key);
        self.inner.lock().stats.record_oversize();
    }

    /// Eviction action of the expiration list. Entries recommitted with a
    /// later expiration since the sweep started are kept.
    fn evict_expired(&self, hash: u64) {
        let now = unix_time();
        let mut inner = self.inner.lock();

        let expired = inner
            .values
            .get(&hash)
            .map_or(false, |entry| entry.is_expired_at(now));
        if expired {
            inner.remove(hash);
            inner.stats.record_eviction();
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("options", &self.options)
            .field("entries", &self.len())
            .field("has_parent", &self.has_parent())
            .finish()
    }
}
