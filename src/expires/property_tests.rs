//! Property-Based Tests for Expiration Lists

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::expires::ExpiresList;

fn adds_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..32, 0i64..64), 1..100)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Repeated adds for one id keep only the latest expiration
    #[test]
    fn prop_repeated_add_keeps_latest(times in prop::collection::vec(0i64..1_000, 1..50)) {
        let list = ExpiresList::new();
        for t in &times {
            list.add(7, *t);
        }

        prop_assert_eq!(list.len(), 1);
        prop_assert_eq!(list.bucket_count(), 1);
        prop_assert_eq!(list.expires_at(7), times.last().copied());
    }

    // GC before every expiry changes nothing
    #[test]
    fn prop_gc_before_expiry_is_noop(adds in adds_strategy()) {
        let list = ExpiresList::new();
        for (id, t) in &adds {
            list.add(*id, *t);
        }
        let min = adds.iter().map(|(_, t)| *t).min().unwrap_or(0);
        let before = (list.len(), list.bucket_count());

        let mut calls = 0;
        list.gc(min - 1, |_| calls += 1);

        prop_assert_eq!(calls, 0);
        prop_assert_eq!((list.len(), list.bucket_count()), before);
    }

    // GC at the latest expiry visits each distinct id once and empties the list
    #[test]
    fn prop_gc_at_max_empties(adds in adds_strategy()) {
        let list = ExpiresList::new();
        let mut latest = HashMap::new();
        for (id, t) in &adds {
            list.add(*id, *t);
            latest.insert(*id, *t);
        }
        let max = latest.values().copied().max().unwrap_or(0);

        let mut seen = Vec::new();
        list.gc(max, |id| seen.push(id));

        let distinct: HashSet<i64> = seen.iter().copied().collect();
        prop_assert_eq!(seen.len(), distinct.len());
        prop_assert_eq!(distinct, latest.keys().copied().collect::<HashSet<_>>());
        prop_assert!(list.is_empty());
        prop_assert_eq!(list.bucket_count(), 0);
    }

    // GC at an arbitrary time evicts exactly the ids due by then
    #[test]
    fn prop_gc_partitions_by_time(adds in adds_strategy(), now in 0i64..64) {
        let list = ExpiresList::new();
        let mut latest = HashMap::new();
        for (id, t) in &adds {
            list.add(*id, *t);
            latest.insert(*id, *t);
        }

        let mut seen = HashSet::new();
        list.gc(now, |id| {
            seen.insert(id);
        });

        let due: HashSet<i64> = latest.iter().filter(|(_, t)| **t <= now).map(|(id, _)| *id).collect();
        prop_assert_eq!(&seen, &due);
        prop_assert_eq!(list.len(), latest.len() - due.len());
    }

    // Removed ids are never reported by a later GC
    #[test]
    fn prop_removed_never_collected(adds in adds_strategy(), removed in 0i64..32) {
        let list = ExpiresList::new();
        for (id, t) in &adds {
            list.add(*id, *t);
        }
        list.remove(removed);

        let mut seen = Vec::new();
        list.gc(i64::MAX, |id| seen.push(id));
        prop_assert!(!seen.contains(&removed));
    }
}
