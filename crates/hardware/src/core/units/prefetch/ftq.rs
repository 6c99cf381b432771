//! Fetch Target Queue (FTQ).
//!
//! A bounded FIFO of upcoming fetch blocks. The branch predictor (or, for
//! synthetic traffic, the cache access stream) pushes block addresses at the
//! tail; the fetch-directed engine scans a window of entries behind the head
//! for prefetch candidates and retires the head once the queue has run far
//! enough ahead.
//!
//! Entries are unique per cache block across the whole queue.

use std::collections::VecDeque;

use crate::common::addr::Address;

/// One fetch block awaiting fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FtqEntry {
    /// Block-aligned fetch address.
    pub fetch_addr: Address,
    /// Instruction pointer that produced the entry.
    pub ip: Address,
    /// Whether the entry ends in a branch.
    pub is_branch: bool,
    /// Whether the filter selected this block for prefetching.
    pub prefetch_candidate: bool,
    /// Whether the block has already been pushed to the prefetch queue.
    pub enqueued: bool,
    /// Predictor confidence attached to the entry.
    pub confidence: u8,
}

/// Bounded, block-deduplicated fetch target queue.
#[derive(Clone, Debug)]
pub struct FetchTargetQueue {
    entries: VecDeque<FtqEntry>,
    capacity: usize,
}

impl FetchTargetQueue {
    /// Creates an empty queue holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends the block containing `addr`.
    ///
    /// Returns `false`, leaving the queue unchanged, when the queue is full or
    /// already holds an entry for the same block.
    pub fn push(&mut self, addr: Address, ip: Address, is_branch: bool) -> bool {
        if self.entries.len() >= self.capacity || self.contains_block(addr) {
            return false;
        }
        self.entries.push_back(FtqEntry {
            fetch_addr: addr.block().address(),
            ip,
            is_branch,
            ..FtqEntry::default()
        });
        true
    }

    /// Returns true if an entry for the block containing `addr` is queued.
    pub fn contains_block(&self, addr: Address) -> bool {
        self.entries.iter().any(|e| e.fetch_addr.same_block(addr))
    }

    /// Mutable view of the entries at offsets `[start, end)` from the head,
    /// clipped to the current length.
    pub fn window_mut(&mut self, start: usize, end: usize) -> impl Iterator<Item = &mut FtqEntry> {
        let end = end.min(self.entries.len());
        let start = start.min(end);
        self.entries.range_mut(start..end)
    }

    /// Pops the head once the queue holds more than `limit` entries.
    pub fn retire_beyond(&mut self, limit: usize) -> Option<FtqEntry> {
        if self.entries.len() > limit {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Iterates entries from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &FtqEntry> {
        self.entries.iter()
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
