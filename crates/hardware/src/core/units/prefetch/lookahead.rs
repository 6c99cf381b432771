//! Stride Lookahead Prefetcher.
//!
//! Watches the block stream of each instruction pointer. When an IP touches
//! three consecutive blocks in ascending order (two successive +1 strides) the
//! engine arms a burst: over the following cycles it prefetches the next
//! `degree` blocks, one per cycle, stopping early at a page boundary unless the
//! host allows cross-page prefetching. Only one burst is active at a time and
//! a newly armed burst replaces the old one.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per access (tracker lookup), O(1) per cycle
//! - **Space Complexity:** O(S × W) for the tracker
//! - **Best Case:** Long sequential code runs without taken branches
//! - **Worst Case:** Short basic blocks; bursts rarely arm

use tracing::debug;

use super::tracker::{TrackerEntry, TrackerTable};
use super::{CacheAccess, CacheFill, PrefetchHost, Prefetcher};
use crate::common::addr::Address;
use crate::common::constants::LIGHT_LOAD_THRESHOLD;
use crate::common::error::ConfigError;
use crate::config::LookaheadConfig;
use crate::stats::{PrefetchStats, bump};

/// Stride that arms a burst.
const ARMING_STRIDE: i64 = 1;

/// An armed burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookaheadState {
    /// Last block issued (or the triggering block before the first issue).
    pub address: Address,
    /// Block stride between successive prefetches.
    pub stride: i64,
    /// Prefetches left in the burst.
    pub degree: u32,
}

/// Per-IP stride detector with a single lookahead burst.
#[derive(Clone, Debug)]
pub struct StrideLookaheadPrefetcher {
    table: TrackerTable,
    degree: u32,
    active: Option<LookaheadState>,
    stats: PrefetchStats,
}

impl StrideLookaheadPrefetcher {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the tracker is empty or the degree is zero.
    pub fn new(config: &LookaheadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &LookaheadConfig) -> Self {
        Self {
            table: TrackerTable::new(config.tracker_sets, config.tracker_ways),
            degree: config.degree,
            active: None,
            stats: PrefetchStats::default(),
        }
    }

    /// The active burst, if any.
    pub const fn active(&self) -> Option<&LookaheadState> {
        self.active.as_ref()
    }

    /// The per-IP tracker.
    pub const fn tracker(&self) -> &TrackerTable {
        &self.table
    }
}

impl Default for StrideLookaheadPrefetcher {
    fn default() -> Self {
        Self::build(&LookaheadConfig::default())
    }
}

impl Prefetcher for StrideLookaheadPrefetcher {
    fn initialize(&mut self) {
        self.table.clear();
        self.active = None;
        self.stats = PrefetchStats::default();
    }

    fn cache_operate(&mut self, access: &CacheAccess) -> u32 {
        if access.hit && access.useful_prefetch {
            bump(&mut self.stats.useful);
        }

        let block = access.addr.block();
        let stride = self.table.check_hit(access.ip).map_or(0, |prev| {
            let stride = block.distance(prev.last_block);
            if stride == ARMING_STRIDE && stride == prev.last_stride {
                self.active = Some(LookaheadState {
                    address: block.address(),
                    stride,
                    degree: self.degree,
                });
                bump(&mut self.stats.bursts_armed);
                debug!(ip = %access.ip, base = %block.address(), "lookahead burst armed");
            }
            stride
        });

        self.table.fill(TrackerEntry {
            ip: access.ip,
            last_block: block,
            last_stride: stride,
        });
        access.metadata
    }

    fn cycle_operate<H: PrefetchHost + ?Sized>(&mut self, host: &mut H) {
        let Some(state) = self.active else {
            return;
        };

        let next = state.address.block().offset(state.stride).address();
        if !host.virtual_prefetch() && next.page() != state.address.page() {
            self.active = None;
            bump(&mut self.stats.bursts_page_cross);
            debug!(next = %next, "lookahead burst stopped at page boundary");
            return;
        }

        let fill_this_level = host.mshr_occupancy_ratio() < LIGHT_LOAD_THRESHOLD;
        if !host.prefetch_line(next, fill_this_level, 0) {
            bump(&mut self.stats.issue_failures);
            return;
        }

        bump(&mut self.stats.issued);
        let degree = state.degree.saturating_sub(1);
        self.active = (degree > 0).then_some(LookaheadState {
            address: next,
            stride: state.stride,
            degree,
        });
    }

    fn cache_fill(&mut self, fill: &CacheFill) -> u32 {
        fill.metadata
    }

    fn final_stats(&self) -> PrefetchStats {
        self.stats.clone()
    }
}
