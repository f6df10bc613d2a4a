//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::StoreOptions;

/// Edge cache node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Total bytes the memory store may hold, 0 = unlimited
    pub memory_capacity_bytes: u64,
    /// Per-item body limit applied by the HTTP surface, 0 = unlimited
    pub max_item_size: u64,
    /// Default TTL in seconds for entries written without explicit TTL
    pub default_ttl: u64,
    /// Expiration sweep interval in seconds
    pub gc_interval: u64,
    /// Capacity of the dirty-key notification queue
    pub dirty_queue_size: usize,
    /// Maximum number of keys remembered in the ignore set
    pub ignore_set_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_CAPACITY_BYTES` - Store capacity in bytes (default: 0, unlimited)
    /// - `MAX_ITEM_SIZE` - Per-item body limit in bytes (default: 32 MiB)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `GC_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `DIRTY_QUEUE_SIZE` - Dirty notification queue size (default: 4096)
    /// - `IGNORE_SET_CAPACITY` - Ignore set size (default: 32768)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory_capacity_bytes: env_or("MEMORY_CAPACITY_BYTES", defaults.memory_capacity_bytes),
            max_item_size: env_or("MAX_ITEM_SIZE", defaults.max_item_size),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            gc_interval: env_or("GC_INTERVAL", defaults.gc_interval),
            dirty_queue_size: env_or("DIRTY_QUEUE_SIZE", defaults.dirty_queue_size),
            ignore_set_capacity: env_or("IGNORE_SET_CAPACITY", defaults.ignore_set_capacity),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Store options derived from this configuration.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            memory_capacity_bytes: self.memory_capacity_bytes,
            dirty_queue_size: self.dirty_queue_size,
            ignore_set_capacity: self.ignore_set_capacity,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_capacity_bytes: 0,
            max_item_size: 32 * 1024 * 1024,
            default_ttl: 300,
            gc_interval: 1,
            dirty_queue_size: 4096,
            ignore_set_capacity: 32768,
            server_port: 3000,
        }
    }
}
