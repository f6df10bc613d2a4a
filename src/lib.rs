//! Edge Cache - in-memory cache tier of an edge proxy node
//!
//! Transactional per-key writers over a fingerprint-indexed memory store,
//! with time-bucketed expiration lists swept by a background GC manager.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod expires;
pub mod models;

pub use api::AppState;
pub use cache::{CacheEntry, MemoryStore, MemoryWriter, ParentStore, StoreOptions};
pub use config::Config;
pub use error::{CacheError, Result};
pub use expires::{ExpiresList, GcManager};
