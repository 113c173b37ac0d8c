//! Recently-answered message cache.
//!
//! Window snapshots can surface the same chat line across consecutive polls,
//! so the engine remembers a bounded set of fingerprints for messages it has
//! already answered. Fingerprints cover sender and content only; the
//! observation timestamp is deliberately excluded so a re-observed line
//! hashes the same way.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use bainian_core::types::Message;

/// Bounded FIFO cache of answered-message fingerprints.
///
/// A capacity of zero disables deduplication entirely: nothing is recorded
/// and every message reads as unseen.
#[derive(Debug)]
pub struct RecentMessageCache {
    capacity: usize,
    order: VecDeque<u64>,
    seen: HashSet<u64>,
}

impl RecentMessageCache {
    /// Create a cache holding at most `capacity` fingerprints.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Returns true if this message was already answered.
    pub fn contains(&self, message: &Message) -> bool {
        if self.capacity == 0 {
            return false;
        }
        self.seen.contains(&fingerprint(message))
    }

    /// Record a message as answered, evicting the oldest entry when full.
    pub fn record(&mut self, message: &Message) {
        if self.capacity == 0 {
            return;
        }
        let fp = fingerprint(message);
        if self.seen.contains(&fp) {
            return;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(fp);
        self.seen.insert(fp);
    }

    /// Number of fingerprints currently held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn fingerprint(message: &Message) -> u64 {
    let mut hasher = DefaultHasher::new();
    message.sender.hash(&mut hasher);
    message.content.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, content: &str) -> Message {
        Message::new(sender.to_string(), content.to_string())
    }

    #[test]
    fn test_unseen_message_not_contained() {
        let cache = RecentMessageCache::new(4);
        assert!(!cache.contains(&msg("Alice", "新年快乐")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_recorded_message_is_contained() {
        let mut cache = RecentMessageCache::new(4);
        cache.record(&msg("Alice", "新年快乐"));
        assert!(cache.contains(&msg("Alice", "新年快乐")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_timestamp_does_not_affect_fingerprint() {
        let mut cache = RecentMessageCache::new(4);
        cache.record(&msg("Alice", "新年快乐"));
        // Same sender and content observed later still reads as answered.
        assert!(cache.contains(&msg("Alice", "新年快乐")));
    }

    #[test]
    fn test_sender_distinguishes_messages() {
        let mut cache = RecentMessageCache::new(4);
        cache.record(&msg("Alice", "新年快乐"));
        assert!(!cache.contains(&msg("Bob", "新年快乐")));
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut cache = RecentMessageCache::new(2);
        cache.record(&msg("A", "one"));
        cache.record(&msg("B", "two"));
        cache.record(&msg("C", "three"));

        assert!(!cache.contains(&msg("A", "one")));
        assert!(cache.contains(&msg("B", "two")));
        assert!(cache.contains(&msg("C", "three")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_duplicate_record_does_not_evict() {
        let mut cache = RecentMessageCache::new(2);
        cache.record(&msg("A", "one"));
        cache.record(&msg("B", "two"));
        cache.record(&msg("B", "two"));

        assert!(cache.contains(&msg("A", "one")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_dedup() {
        let mut cache = RecentMessageCache::new(0);
        cache.record(&msg("Alice", "新年快乐"));
        assert!(!cache.contains(&msg("Alice", "新年快乐")));
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }
}
