//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for storing an entry (PUT /cache/*key)
///
/// # Fields
/// - `header`: Raw header text stored ahead of the body
/// - `body`: Body text
/// - `ttl`: Optional TTL in seconds (uses default if not specified)
/// - `status`: Response status recorded with the entry (default 200)
/// - `dirty`: Whether the entry should be forwarded to the parent tier
/// - `max_size`: Body limit in bytes, overrides the configured default
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    #[serde(default)]
    pub header: String,
    pub body: String,
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default)]
    pub max_size: Option<u64>,
}

/// Validates a cache key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
