//! Memory Writer Module
//!
//! Single-use write transaction for one key. Header and body bytes are
//! buffered privately, then published to the store on close or thrown away
//! on discard.

use std::sync::Arc;

use crate::cache::fingerprint::fingerprint;
use crate::cache::once::{EndFn, FireOnce};
use crate::cache::{CacheEntry, MemoryStore};
use crate::error::{CacheError, Result};

// == Memory Writer ==
pub struct MemoryWriter {
    store: Arc<MemoryStore>,
    key: String,
    hash: u64,
    expires_at: i64,
    is_dirty: bool,
    /// Body limit in bytes, 0 = unlimited
    max_size: u64,
    header_size: u64,
    body_size: u64,
    oversize: bool,
    /// Pending entry, taken on close or discard
    entry: Option<CacheEntry>,
    end: FireOnce,
}

impl MemoryWriter {
    // == Constructor ==
    /// Creates a writer bound to `store`. `end_fn` runs exactly once when the
    /// writer is closed, discarded or dropped, whichever happens first.
    pub fn new(
        store: Arc<MemoryStore>,
        key: &str,
        expires_at: i64,
        status: i32,
        is_dirty: bool,
        max_size: u64,
        end_fn: EndFn,
    ) -> Self {
        Self {
            store,
            key: key.to_string(),
            hash: fingerprint(key),
            expires_at,
            is_dirty,
            max_size,
            header_size: 0,
            body_size: 0,
            oversize: false,
            entry: Some(CacheEntry::new(expires_at, status)),
            end: FireOnce::new(end_fn),
        }
    }

    // == Write Header ==
    pub fn write_header(&mut self, data: &[u8]) -> Result<usize> {
        let entry = self.pending()?;
        entry.header.extend_from_slice(data);
        self.header_size += data.len() as u64;
        Ok(data.len())
    }

    // == Write ==
    /// Appends body bytes.
    ///
    /// Once the body exceeds `max_size` every call returns
    /// [`CacheError::EntityTooLarge`] and the key is put on the store's ignore
    /// list. The bytes are still buffered; the caller is expected to discard.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let entry = self.pending()?;
        entry.body.extend_from_slice(data);
        self.body_size += data.len() as u64;

        if self.max_size > 0 && self.body_size > self.max_size {
            if !self.oversize {
                self.oversize = true;
                self.store.reject_oversize(&self.key);
            }
            return Err(CacheError::EntityTooLarge(self.key.clone()));
        }

        Ok(data.len())
    }

    // == Write At ==
    /// Entries are append-only; positional writes always fail.
    pub fn write_at(&mut self, _offset: u64, _data: &[u8]) -> Result<()> {
        Err(CacheError::NotSupported("write_at".to_string()))
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn body_size(&self) -> u64 {
        self.body_size
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn fingerprint(&self) -> u64 {
        self.hash
    }

    /// True once close or discard has run.
    pub fn is_finished(&self) -> bool {
        self.end.has_fired()
    }

    // == Close ==
    /// Commits the entry to the store. No-op after the first close or discard.
    ///
    /// Fails with [`CacheError::NotEnoughSpace`] when the entry no longer fits;
    /// the writer is finished either way.
    pub fn close(&mut self) -> Result<()> {
        if self.end.has_fired() {
            return Ok(());
        }

        let result = match self.entry.take() {
            Some(entry) => self.store.commit(&self.key, self.hash, entry, self.is_dirty),
            None => Ok(()),
        };

        // Outside the store lock
        self.end.fire();
        result
    }

    // == Discard ==
    /// Drops the pending entry and anything already stored under this key's
    /// fingerprint. No-op after the first close or discard.
    pub fn discard(&mut self) -> Result<()> {
        if self.end.has_fired() {
            return Ok(());
        }

        self.entry = None;
        self.store.discard(self.hash);

        self.end.fire();
        Ok(())
    }

    fn pending(&mut self) -> Result<&mut CacheEntry> {
        self.entry
            .as_mut()
            .ok_or_else(|| CacheError::WriterClosed(self.key.clone()))
    }
}

impl Drop for MemoryWriter {
    /// An abandoned writer releases its key without touching the store.
    fn drop(&mut self) {
        self.end.fire();
    }
}

impl std::fmt::Debug for MemoryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryWriter")
            .field("key", &self.key)
            .field("expires_at", &self.expires_at)
            .field("header_size", &self.header_size)
            .field("body_size", &self.body_size)
            .field("finished", &self.is_finished())
            .finish()
    }
}
