//! Fixed-capacity history buffer.
//!
//! Eviction order: entries are kept in insertion order and, once the buffer
//! is full, each push drops the single oldest entry (the front). Iteration
//! runs oldest to newest.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ring-style log that never grows past its capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Create an empty log. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted oldest entry if the log was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Most recently pushed entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut log = BoundedLog::new(3);
        assert_eq!(log.push(1), None);
        assert_eq!(log.push(2), None);
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest(), Some(&2));
        assert_eq!(log.oldest(), Some(&1));
    }

    #[test]
    fn test_oldest_evicted_first() {
        let mut log = BoundedLog::new(3);
        for i in 0..3 {
            log.push(i);
        }
        assert_eq!(log.push(3), Some(0));
        assert_eq!(log.push(4), Some(1));
        let remaining: Vec<_> = log.iter().copied().collect();
        assert_eq!(remaining, vec![2, 3, 4]);
        assert_eq!(log.len(), log.capacity());
    }

    #[test]
    fn test_zero_capacity_raised() {
        let mut log = BoundedLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest(), Some(&"b"));
    }
}
