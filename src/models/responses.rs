//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for a lookup (GET /cache/*key)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub status: i32,
    /// Header bytes, lossily decoded as UTF-8
    pub header: String,
    /// Body bytes, lossily decoded as UTF-8
    pub body: String,
    pub header_size: usize,
    pub body_size: usize,
    /// Unix seconds
    pub expires_at: i64,
    /// Unix seconds
    pub modified_at: i64,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, entry: &CacheEntry) -> Self {
        Self {
            key: key.into(),
            status: entry.status,
            header: String::from_utf8_lossy(&entry.header).into_owned(),
            body: String::from_utf8_lossy(&entry.body).into_owned(),
            header_size: entry.header.len(),
            body_size: entry.body.len(),
            expires_at: entry.expires_at,
            modified_at: entry.modified_at,
        }
    }
}

/// Response body for a store operation (PUT /cache/*key)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
    /// Expiration time in ISO 8601 format
    pub expires_at: String,
}

impl PutResponse {
    pub fn new(key: impl Into<String>, expires_at: i64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached successfully", key),
            key,
            expires_at: chrono::DateTime::from_timestamp(expires_at, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Response body for a purge (DELETE /cache/*key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Items tracked by the store's expiration list
    pub tracked_expirations: usize,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, tracked_expirations: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            tracked_expirations,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_response_serialize() {
        let mut entry = CacheEntry::new(1_700_000_000, 200);
        entry.header.extend_from_slice(b"X-Test: 1");
        entry.body.extend_from_slice(b"hello");

        let resp = EntryResponse::new("test_key", &entry);
        assert_eq!(resp.header_size, 9);
        assert_eq!(resp.body_size, 5);

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains("hello"));
        assert!(json.contains("1700000000"));
    }

    #[test]
    fn test_put_response_serialize() {
        let resp = PutResponse::new("my_key", 0);
        assert_eq!(resp.expires_at, "1970-01-01T00:00:00+00:00");

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.total_entries = 3;

        let resp = StatsResponse::new(stats, 3);
        assert!((resp.hit_rate - 0.5).abs() < 0.001);

        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_entries"], 3);
        assert_eq!(json["tracked_expirations"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
