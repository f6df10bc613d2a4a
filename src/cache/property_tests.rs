//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check writer lifecycle and store commit behavior.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{unix_time, MemoryStore, StoreOptions};
use crate::error::CacheError;

// == Strategies ==
/// Generates cache keys shaped like proxied URLs
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}(/[a-zA-Z0-9_]{1,16}){0,3}".prop_map(|s| format!("https://{}", s))
}

/// Generates body chunks
fn chunks_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8)
}

/// Lifecycle calls a caller may make after writing
#[derive(Debug, Clone, Copy)]
enum Finish {
    Close,
    Discard,
}

fn finish_strategy() -> impl Strategy<Value = Vec<Finish>> {
    prop::collection::vec(
        prop_oneof![Just(Finish::Close), Just(Finish::Discard)],
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Close/discard in any order and number fire the completion callback
    // exactly once, and the first call decides whether the entry is kept.
    #[test]
    fn prop_completion_fires_once(
        key in valid_key_strategy(),
        chunks in chunks_strategy(),
        calls in finish_strategy()
    ) {
        let store = MemoryStore::new(StoreOptions::default());
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut writer = store
            .open_writer_with(&key, unix_time() + 60, 200, false, 0, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        for chunk in &chunks {
            writer.write(chunk).unwrap();
        }

        for call in &calls {
            match call {
                Finish::Close => writer.close().unwrap(),
                Finish::Discard => writer.discard().unwrap(),
            }
        }
        drop(writer);

        prop_assert_eq!(count.load(Ordering::SeqCst), 1);
        prop_assert!(!store.is_writing(&key));

        let committed = matches!(calls[0], Finish::Close);
        prop_assert_eq!(store.lookup(&key).is_some(), committed);
    }

    // Committed bodies equal the concatenation of the written chunks
    #[test]
    fn prop_roundtrip_body(key in valid_key_strategy(), chunks in chunks_strategy()) {
        let store = MemoryStore::new(StoreOptions::default());

        let mut writer = store.open_writer(&key, unix_time() + 60, 200, false, 0).unwrap();
        for chunk in &chunks {
            writer.write(chunk).unwrap();
        }
        writer.close().unwrap();

        let expected: Vec<u8> = chunks.concat();
        let entry = store.lookup(&key).unwrap();
        prop_assert_eq!(&entry.body, &expected);
        prop_assert_eq!(store.stats().used_bytes, expected.len() as u64);
    }

    // A write crossing the limit fails and marks the key ignored; below the
    // limit every write succeeds
    #[test]
    fn prop_oversize_marks_ignored(
        key in valid_key_strategy(),
        chunks in chunks_strategy(),
        max_size in 1u64..256
    ) {
        let store = MemoryStore::new(StoreOptions::default());
        let mut writer = store.open_writer(&key, unix_time() + 60, 200, false, max_size).unwrap();

        let mut total = 0u64;
        let mut failed = false;
        for chunk in &chunks {
            total += chunk.len() as u64;
            let result = writer.write(chunk);
            if total > max_size {
                prop_assert!(matches!(result, Err(CacheError::EntityTooLarge(_))));
                failed = true;
            } else {
                prop_assert!(result.is_ok());
            }
        }

        prop_assert_eq!(store.is_ignored(&key), failed);
        writer.discard().unwrap();
        prop_assert!(store.lookup(&key).is_none());
    }

    // The last commit per key wins and the entry count matches distinct keys
    #[test]
    fn prop_last_commit_wins(
        writes in prop::collection::vec((valid_key_strategy(), any::<u8>()), 1..40)
    ) {
        let store = MemoryStore::new(StoreOptions::default());
        let mut expected = HashMap::new();

        for (key, byte) in &writes {
            let mut writer = store.open_writer(key, unix_time() + 60, 200, false, 0).unwrap();
            writer.write(&[*byte]).unwrap();
            writer.close().unwrap();
            expected.insert(key.clone(), *byte);
        }

        prop_assert_eq!(store.len(), expected.len());
        prop_assert_eq!(store.expires_list().len(), expected.len());
        for (key, byte) in expected {
            prop_assert_eq!(store.lookup(&key).unwrap().body.clone(), vec![byte]);
        }
    }
}
