//! Prefetch queue and outstanding-prefetch buffer.
//!
//! The queue holds blocks accepted by the filter but not yet issued. The buffer
//! remembers issued blocks until their fill returns, so a block that is already
//! in flight is not requested again.

use std::collections::VecDeque;

use crate::common::addr::Address;

/// One issued prefetch awaiting its fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefetchBufferEntry {
    /// Block-aligned prefetched address.
    pub addr: Address,
    /// Whether the slot is occupied.
    pub valid: bool,
    /// Cycle at which the prefetch was issued.
    pub issue_cycle: u64,
}

/// Fixed-size table of in-flight prefetches.
#[derive(Clone, Debug)]
pub struct PrefetchBuffer {
    entries: Vec<PrefetchBufferEntry>,
}

impl PrefetchBuffer {
    /// Creates an empty buffer with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![PrefetchBufferEntry::default(); size],
        }
    }

    /// Returns true if a prefetch for the block containing `addr` is in flight.
    pub fn contains(&self, addr: Address) -> bool {
        self.entries
            .iter()
            .any(|e| e.valid && e.addr.same_block(addr))
    }

    /// Records an issued prefetch in the first free slot.
    ///
    /// Returns `false` when every slot is occupied; the prefetch is then simply
    /// not tracked.
    pub fn record(&mut self, addr: Address, cycle: u64) -> bool {
        let Some(slot) = self.entries.iter_mut().find(|e| !e.valid) else {
            return false;
        };
        *slot = PrefetchBufferEntry {
            addr: addr.block().address(),
            valid: true,
            issue_cycle: cycle,
        };
        true
    }

    /// Frees the first slot tracking the block containing `addr`.
    pub fn clear(&mut self, addr: Address) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.valid && e.addr.same_block(addr))
        {
            Some(slot) => {
                slot.valid = false;
                true
            }
            None => false,
        }
    }

    /// Number of occupied slots.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Frees every slot.
    pub fn reset(&mut self) {
        self.entries.fill(PrefetchBufferEntry::default());
    }
}

/// Bounded FIFO of blocks waiting to be issued, unique per block.
#[derive(Clone, Debug)]
pub struct PrefetchQueue {
    pending: VecDeque<Address>,
    capacity: usize,
}

impl PrefetchQueue {
    /// Creates an empty queue holding at most `capacity` blocks.
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends the block containing `addr` unless the queue is full or
    /// already holds it.
    pub fn push(&mut self, addr: Address) -> bool {
        if self.pending.len() >= self.capacity || self.pending.iter().any(|a| a.same_block(addr)) {
            return false;
        }
        self.pending.push_back(addr.block().address());
        true
    }

    /// Oldest waiting block.
    pub fn front(&self) -> Option<Address> {
        self.pending.front().copied()
    }

    /// Removes the oldest waiting block.
    pub fn pop(&mut self) -> Option<Address> {
        self.pending.pop_front()
    }

    /// Number of waiting blocks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every waiting block.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
