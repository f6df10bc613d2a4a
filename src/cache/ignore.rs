//! Fixed Set Module
//!
//! Bounded set of keys excluded from caching.

use std::collections::{HashSet, VecDeque};

// == Fixed Set ==
/// Insertion-ordered set with a fixed capacity.
///
/// When full, inserting a new key drops the oldest one:
/// - Front = Oldest insert
/// - Back = Newest insert
#[derive(Debug)]
pub struct FixedSet {
    /// Order of keys by insertion time
    order: VecDeque<String>,
    /// Membership index
    members: HashSet<String>,
    /// Maximum number of keys retained, 0 = unbounded
    capacity: usize,
}

impl FixedSet {
    // == Constructor ==
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            capacity,
        }
    }

    // == Push ==
    /// Adds a key. Re-adding an existing key is a no-op.
    pub fn push(&mut self, key: &str) {
        if self.members.contains(key) {
            return;
        }

        if self.capacity > 0 && self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }

        self.order.push_back(key.to_string());
        self.members.insert(key.to_string());
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_set_new() {
        let set = FixedSet::new(4);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_push_is_idempotent() {
        let mut set = FixedSet::new(4);

        set.push("key1");
        set.push("key1");
        set.push("key1");

        assert_eq!(set.len(), 1);
        assert!(set.contains("key1"));
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut set = FixedSet::new(3);

        set.push("a");
        set.push("b");
        set.push("c");
        set.push("d");

        assert_eq!(set.len(), 3);
        assert!(!set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
        assert!(set.contains("d"));
    }

    #[test]
    fn test_repush_does_not_refresh_order() {
        let mut set = FixedSet::new(2);

        set.push("a");
        set.push("b");
        // Already present, so "a" keeps its place as oldest
        set.push("a");
        set.push("c");

        assert!(!set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let mut set = FixedSet::new(0);
        for i in 0..100 {
            set.push(&format!("key{}", i));
        }
        assert_eq!(set.len(), 100);
    }
}
