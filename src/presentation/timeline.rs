//! Deadline-ordered queue of pending cues.
//!
//! Time is plain milliseconds on whatever clock the owner uses. Entries with
//! the same deadline pop in insertion order, so cues scheduled for the same
//! instant keep their program order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    due: u64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap yields the earliest deadline first.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub struct Timeline<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due, seq, item });
    }

    /// Removes and returns the earliest entry whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, T)> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|entry| (entry.due, entry.item))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|entry| entry.due)
    }

    /// Drops every pending entry, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
