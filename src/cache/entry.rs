//! Cache Entry Module
//!
//! Defines the value stored per key: raw header and body bytes of a cached
//! response plus its timestamps and status.

// == Cache Entry ==
/// A single cached response.
///
/// Header and body bytes only grow while the owning writer is open and are
/// never modified once the entry has been committed to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw header bytes
    pub header: Vec<u8>,
    /// Raw body bytes
    pub body: Vec<u8>,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: i64,
    /// Creation timestamp (Unix seconds)
    pub modified_at: i64,
    /// Caller-supplied status, usually the origin response code
    pub status: i32,
    /// Set by the writer on commit; unfinished entries are never readable
    pub is_done: bool,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an empty, unfinished entry stamped with the current time.
    pub fn new(expires_at: i64, status: i32) -> Self {
        Self {
            header: Vec::new(),
            body: Vec::new(),
            expires_at,
            modified_at: unix_time(),
            status,
            is_done: false,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` has reached its expiration time.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Total bytes held by this entry.
    pub fn size(&self) -> u64 {
        (self.header.len() + self.body.len()) as u64
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn unix_time() -> i64 {
    chrono::Utc::now().timestamp()
}
