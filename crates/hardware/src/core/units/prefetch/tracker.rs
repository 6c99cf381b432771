//! Per-IP Stride Tracker.
//!
//! A set-associative table keyed by instruction pointer that remembers, for
//! each recently seen IP, the last block it touched and the stride between its
//! last two accesses. Recency within a set is kept with one LRU usage stack per
//! set: a lookup or fill moves the way to the top (MRU position), and a fill
//! into a full set evicts the way at the bottom (LRU position).
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per `check_hit()`/`fill()` where W is the associativity
//! - **Space Complexity:** O(S × W)
//! - **Hardware Cost:** Moderate - full IP tag compare per way, LRU stack per set

use crate::common::addr::{Address, BlockNumber};
use crate::common::constants::IP_ALIGN_SHIFT;

/// One tracked instruction pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackerEntry {
    /// Instruction pointer owning the entry.
    pub ip: Address,
    /// Block touched by the most recent access from `ip`.
    pub last_block: BlockNumber,
    /// Block distance between the two most recent accesses from `ip`.
    pub last_stride: i64,
}

impl TrackerEntry {
    #[inline(always)]
    const fn tag(&self) -> u64 {
        self.ip.slice_upper(IP_ALIGN_SHIFT)
    }
}

/// LRU-managed tracker table.
#[derive(Clone, Debug)]
pub struct TrackerTable {
    /// Ways, laid out set-major.
    slots: Vec<Option<TrackerEntry>>,
    /// One usage stack per set; index 0 is MRU, the last index is LRU.
    usage: Vec<Vec<usize>>,
    sets: usize,
    ways: usize,
}

impl TrackerTable {
    /// Creates an empty tracker.
    ///
    /// # Arguments
    ///
    /// * `sets` - Number of sets (raised to 1 if zero).
    /// * `ways` - Associativity (raised to 1 if zero).
    pub fn new(sets: usize, ways: usize) -> Self {
        let sets = sets.max(1);
        let ways = ways.max(1);
        Self {
            slots: vec![None; sets * ways],
            usage: (0..sets).map(|_| (0..ways).collect()).collect(),
            sets,
            ways,
        }
    }

    #[inline(always)]
    fn set_of(&self, ip: Address) -> usize {
        (ip.slice_upper(IP_ALIGN_SHIFT) % self.sets as u64) as usize
    }

    fn find_way(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        self.slots[base..base + self.ways]
            .iter()
            .position(|slot| slot.is_some_and(|e| e.tag() == tag))
    }

    /// Moves `way` to the MRU position of `set`.
    fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            let _ = stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// Way to replace in `set`: the first empty way, else the LRU way.
    fn victim(&self, set: usize) -> usize {
        let base = set * self.ways;
        self.slots[base..base + self.ways]
            .iter()
            .position(Option::is_none)
            .or_else(|| self.usage[set].last().copied())
            .unwrap_or(0)
    }

    /// Looks up the entry for `ip`, promoting it to MRU on a hit.
    pub fn check_hit(&mut self, ip: Address) -> Option<TrackerEntry> {
        let set = self.set_of(ip);
        let tag = ip.slice_upper(IP_ALIGN_SHIFT);
        let way = self.find_way(set, tag)?;
        self.touch(set, way);
        self.slots[set * self.ways + way]
    }

    /// Writes `entry`, overwriting the same IP's entry or replacing a victim.
    pub fn fill(&mut self, entry: TrackerEntry) {
        let set = self.set_of(entry.ip);
        let way = self
            .find_way(set, entry.tag())
            .unwrap_or_else(|| self.victim(set));
        self.slots[set * self.ways + way] = Some(entry);
        self.touch(set, way);
    }

    /// Number of occupied ways across all sets.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Empties every set and restores the initial recency order.
    pub fn clear(&mut self) {
        self.slots.fill(None);
        for stack in &mut self.usage {
            stack.clear();
            stack.extend(0..self.ways);
        }
    }
}
