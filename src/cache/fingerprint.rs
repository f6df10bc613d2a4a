//! Key fingerprinting.
//!
//! Entries are indexed by a 64-bit xxHash of the key, not by the key itself.
//! Two keys with the same fingerprint share a slot: the later commit replaces
//! the earlier entry. Collisions are not disambiguated.

use xxhash_rust::xxh64::xxh64;

/// Hashes a cache key to the fingerprint used as the store index.
#[inline]
pub fn fingerprint(key: &str) -> u64 {
    xxh64(key.as_bytes(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("https://example.com/a"), fingerprint("https://example.com/a"));
    }

    #[test]
    fn test_fingerprint_distinguishes_keys() {
        assert_ne!(fingerprint("a"), fingerprint("b"));
        assert_ne!(fingerprint(""), fingerprint(" "));
    }

    #[test]
    fn test_fingerprint_known_value() {
        // xxHash64 of the empty input with seed 0
        assert_eq!(fingerprint(""), 0xEF46_DB37_51D8_E999);
    }
}
