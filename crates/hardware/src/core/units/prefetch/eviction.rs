//! Recently-evicted block record.
//!
//! Holds the most recent eviction reported by a fill. A block that was just
//! evicted is the strongest hint that the fetch unit will miss on it again, so
//! the filter consults this record first. Only one eviction is remembered; a
//! newer one overwrites it. The flag is consumed by the first query that
//! matches it.

use crate::common::addr::Address;

/// The remembered eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvictionEntry {
    /// Block-aligned address of the evicted block.
    pub addr: Address,
    /// Whether the eviction has not yet been acted upon.
    pub evicted: bool,
    /// Cycle at which the eviction was reported.
    pub last_access: u64,
}

/// Single-entry eviction record.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvictionTracker {
    entry: Option<EvictionEntry>,
}

impl EvictionTracker {
    /// Creates an empty record.
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Remembers an eviction of the block containing `addr`. Null is ignored.
    pub fn mark(&mut self, addr: Address, cycle: u64) {
        if addr.is_null() {
            return;
        }
        self.entry = Some(EvictionEntry {
            addr: addr.block().address(),
            evicted: true,
            last_access: cycle,
        });
    }

    /// Returns true, clearing the flag, if the block containing `addr` is the
    /// remembered, not yet consumed eviction.
    pub fn take(&mut self, addr: Address) -> bool {
        match &mut self.entry {
            Some(entry) if entry.evicted && entry.addr.same_block(addr) => {
                entry.evicted = false;
                true
            }
            _ => false,
        }
    }

    /// The remembered eviction, if any.
    pub const fn entry(&self) -> Option<&EvictionEntry> {
        self.entry.as_ref()
    }

    /// Forgets the remembered eviction.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}
