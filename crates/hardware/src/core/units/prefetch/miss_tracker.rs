//! Per-set miss counters.
//!
//! Blocks are hashed to a small number of sets (block number modulo the set
//! count). Each demand miss bumps its set's saturating counter; a set whose
//! counter has saturated is "hot" and its blocks are prefetched even without an
//! eviction hint. All counters are cleared together at the end of each epoch.

use crate::common::addr::Address;
use crate::common::counter::saturating_inc;

/// Miss history for one set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissTrackerEntry {
    /// Set this counter belongs to.
    pub set_index: usize,
    /// Saturating miss count for the current epoch.
    pub miss_counter: u8,
}

/// Epoch-reset table of saturating per-set miss counters.
#[derive(Clone, Debug)]
pub struct MissTracker {
    entries: Vec<MissTrackerEntry>,
    max: u8,
    interval: u64,
    last_reset: u64,
}

impl MissTracker {
    /// Creates a tracker with `sets` counters saturating at `max`, cleared
    /// whenever more than `interval` cycles have passed since the last clear.
    pub fn new(sets: usize, max: u8, interval: u64) -> Self {
        Self {
            entries: (0..sets.max(1))
                .map(|set_index| MissTrackerEntry {
                    set_index,
                    miss_counter: 0,
                })
                .collect(),
            max,
            interval,
            last_reset: 0,
        }
    }

    /// Set owning the block containing `addr`.
    #[inline(always)]
    pub fn set_of(&self, addr: Address) -> usize {
        (addr.block().val() % self.entries.len() as u64) as usize
    }

    /// Counts a miss on the block containing `addr`.
    pub fn record_miss(&mut self, addr: Address) {
        let set = self.set_of(addr);
        let entry = &mut self.entries[set];
        entry.miss_counter = saturating_inc(entry.miss_counter, self.max);
    }

    /// Returns true if the set owning `addr` has saturated this epoch.
    pub fn is_hot(&self, addr: Address) -> bool {
        self.entries[self.set_of(addr)].miss_counter >= self.max
    }

    /// Current counter of `set`, or zero for an out-of-range set.
    pub fn counter(&self, set: usize) -> u8 {
        self.entries.get(set).map_or(0, |e| e.miss_counter)
    }

    /// Clears all counters if the epoch has elapsed at `cycle`.
    ///
    /// Returns true when a reset happened.
    pub fn maybe_reset(&mut self, cycle: u64) -> bool {
        if cycle.saturating_sub(self.last_reset) <= self.interval {
            return false;
        }
        self.clear();
        self.last_reset = cycle;
        true
    }

    /// Zeroes every counter and restarts the epoch at cycle zero.
    pub fn reset(&mut self) {
        self.clear();
        self.last_reset = 0;
    }

    fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.miss_counter = 0;
        }
    }

    /// Iterates all counters in set order.
    pub fn iter(&self) -> impl Iterator<Item = &MissTrackerEntry> {
        self.entries.iter()
    }
}
