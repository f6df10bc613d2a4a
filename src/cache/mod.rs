//! Cache Module
//!
//! In-memory cache tier: entries, transactional writers and the
//! fingerprint-indexed store.

mod entry;
mod fingerprint;
mod ignore;
mod once;
mod stats;
mod store;
mod writer;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{unix_time, CacheEntry};
pub use fingerprint::fingerprint;
pub use once::EndFn;
pub use stats::CacheStats;
pub use store::{MemoryStore, ParentStore, StoreOptions};
pub use writer::MemoryWriter;

// == Public Constants ==
/// Maximum allowed key length in bytes for the HTTP surface
pub const MAX_KEY_LENGTH: usize = 2048;
