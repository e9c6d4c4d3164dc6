/// FIFO queue of keys waiting for a bound refresh.
///
/// Each queued key carries the sequence number of its mark. Removal only
/// forgets the key in the map; queue entries whose sequence no longer
/// matches are skipped by `pop`. Keys come out in the order they were
/// marked, each at most once per mark.

use std::collections::VecDeque;
use rustc_hash::FxHashMap;
use slotmap::Key;
use crate::scene::PrimitiveKey;

#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    queue: VecDeque<(PrimitiveKey, u64)>,
    queued: FxHashMap<PrimitiveKey, u64>,
    next_seq: u64,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `key`. Returns false if it was already queued or is null.
    pub fn mark(&mut self, key: PrimitiveKey) -> bool {
        if key.is_null() || self.queued.contains_key(&key) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queued.insert(key, seq);
        self.queue.push_back((key, seq));
        true
    }

    /// Oldest queued key.
    pub fn pop(&mut self) -> Option<PrimitiveKey> {
        while let Some((key, seq)) = self.queue.pop_front() {
            if self.queued.get(&key) == Some(&seq) {
                self.queued.remove(&key);
                return Some(key);
            }
        }
        None
    }

    /// Drop `key` from the queue. Returns false if it was not queued.
    pub fn remove(&mut self, key: PrimitiveKey) -> bool {
        if self.queued.remove(&key).is_none() {
            return false;
        }
        // Stale entries never outnumber live ones for long
        if self.queue.len() > 2 * self.queued.len() + 64 {
            let queued = &self.queued;
            self.queue.retain(|(key, seq)| queued.get(key) == Some(seq));
        }
        true
    }

    pub fn contains(&self, key: PrimitiveKey) -> bool {
        self.queued.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Queue entries including stale ones not yet skipped.
    #[cfg(test)]
    pub(crate) fn backlog(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.clear();
    }
}

#[cfg(test)]
#[path = "dirty_tracker_tests.rs"]
mod tests;
