//! Fetch-Directed Instruction Prefetcher (FDIP).
//!
//! Runs ahead of the fetch unit by walking the fetch target queue. Every cycle
//! it performs the following steps:
//! 1. **Epoch:** Advances its cycle counter and clears the miss counters once
//!    the reset interval has passed.
//! 2. **Scan:** Visits the lookahead window of the FTQ (entries behind the
//!    head) and runs each not-yet-enqueued block through the filter.
//! 3. **Issue:** Drains up to `degree` blocks from the prefetch queue through
//!    the host, stopping at the first refusal.
//! 4. **Retire:** Pops the FTQ head once the queue has grown past the window.
//!
//! The filter checks, in order: a matching recent eviction (prefetch), a
//! saturated miss set (prefetch), an in-flight prefetch for the block (drop),
//! and otherwise prefetches.
//!
//! # Performance
//!
//! - **Time Complexity:** O(L × (B + Q)) per cycle, where L is the window length,
//!   B the outstanding buffer size and Q the prefetch queue size
//! - **Space Complexity:** O(F + B + Q + S) with F the FTQ size and S the miss sets
//! - **Best Case:** Large instruction footprints with recurring eviction of hot code
//! - **Worst Case:** Cold code reached through unpredictable control flow

use tracing::{debug, trace};

use super::buffer::{PrefetchBuffer, PrefetchQueue};
use super::eviction::EvictionTracker;
use super::ftq::FetchTargetQueue;
use super::miss_tracker::MissTracker;
use super::{CacheAccess, CacheFill, PrefetchHost, Prefetcher};
use crate::common::addr::Address;
use crate::common::error::ConfigError;
use crate::config::FdipConfig;
use crate::stats::{PrefetchStats, bump};

/// Why the filter accepted or rejected a candidate block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDecision {
    /// The block was the most recent eviction.
    Evicted,
    /// The block's miss set has saturated this epoch.
    HotSet,
    /// A prefetch for the block is already in flight.
    Outstanding,
    /// No hint either way; prefetch.
    Default,
}

impl FilterDecision {
    /// Returns true if the block should be prefetched.
    pub const fn should_prefetch(self) -> bool {
        !matches!(self, Self::Outstanding)
    }
}

/// State consulted by the candidate filter.
#[derive(Clone, Debug)]
pub struct CandidateFilter {
    /// Most recent eviction.
    pub evictions: EvictionTracker,
    /// Per-set miss counters.
    pub misses: MissTracker,
    /// In-flight prefetches.
    pub outstanding: PrefetchBuffer,
}

impl CandidateFilter {
    /// Classifies the block containing `addr`.
    ///
    /// A matching eviction is consumed by this call.
    pub fn classify(&mut self, addr: Address) -> FilterDecision {
        if self.evictions.take(addr) {
            FilterDecision::Evicted
        } else if self.misses.is_hot(addr) {
            FilterDecision::HotSet
        } else if self.outstanding.contains(addr) {
            FilterDecision::Outstanding
        } else {
            FilterDecision::Default
        }
    }

    fn reset(&mut self) {
        self.evictions.clear();
        self.misses.reset();
        self.outstanding.reset();
    }
}

/// FTQ-driven instruction prefetcher.
#[derive(Clone, Debug)]
pub struct FdipPrefetcher {
    ftq: FetchTargetQueue,
    queue: PrefetchQueue,
    filter: CandidateFilter,
    lookahead_start: usize,
    lookahead_end: usize,
    degree: usize,
    cycle: u64,
    stats: PrefetchStats,
}

impl FdipPrefetcher {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a table is empty, the degree is zero, or
    /// the lookahead window is empty, inverted, or ends at the FTQ capacity.
    pub fn new(config: &FdipConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &FdipConfig) -> Self {
        Self {
            ftq: FetchTargetQueue::new(config.ftq_size),
            queue: PrefetchQueue::new(config.queue_size),
            filter: CandidateFilter {
                evictions: EvictionTracker::new(),
                misses: MissTracker::new(
                    config.miss_tracker_sets,
                    config.miss_counter_max,
                    config.miss_reset_interval,
                ),
                outstanding: PrefetchBuffer::new(config.buffer_size),
            },
            lookahead_start: config.lookahead_start,
            lookahead_end: config.lookahead_end,
            degree: config.degree,
            cycle: 0,
            stats: PrefetchStats::default(),
        }
    }

    /// Pushes a predicted fetch block onto the FTQ.
    ///
    /// Returns `false` if the FTQ is full or already holds the block.
    pub fn enqueue_fetch(&mut self, addr: Address, ip: Address, is_branch: bool) -> bool {
        self.ftq.push(addr, ip, is_branch)
    }

    /// The fetch target queue.
    pub const fn ftq(&self) -> &FetchTargetQueue {
        &self.ftq
    }

    /// Blocks accepted by the filter and waiting to issue.
    pub const fn queue(&self) -> &PrefetchQueue {
        &self.queue
    }

    /// Filter state.
    pub const fn filter(&self) -> &CandidateFilter {
        &self.filter
    }

    /// Mutable filter state.
    pub fn filter_mut(&mut self) -> &mut CandidateFilter {
        &mut self.filter
    }

    /// Cycles elapsed since construction or the last `initialize`.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    fn scan_window(&mut self) {
        for entry in self.ftq.window_mut(self.lookahead_start, self.lookahead_end) {
            if entry.enqueued {
                continue;
            }
            let decision = self.filter.classify(entry.fetch_addr);
            if !decision.should_prefetch() {
                bump(&mut self.stats.filtered);
                continue;
            }
            trace!(addr = %entry.fetch_addr, ?decision, "prefetch candidate");
            entry.prefetch_candidate = true;
            entry.enqueued = true;
            let _ = self.queue.push(entry.fetch_addr);
        }
    }

    fn issue<H: PrefetchHost + ?Sized>(&mut self, host: &mut H) {
        for _ in 0..self.degree {
            let Some(addr) = self.queue.front() else {
                break;
            };
            if !host.prefetch_line(addr, true, 0) {
                bump(&mut self.stats.issue_failures);
                trace!(addr = %addr, "prefetch refused by host");
                break;
            }
            if !self.filter.outstanding.record(addr, self.cycle) {
                trace!(addr = %addr, "outstanding buffer full");
            }
            bump(&mut self.stats.issued);
            let _ = self.queue.pop();
        }
    }
}

impl Default for FdipPrefetcher {
    fn default() -> Self {
        Self::build(&FdipConfig::default())
    }
}

impl Prefetcher for FdipPrefetcher {
    fn initialize(&mut self) {
        self.ftq.clear();
        self.queue.clear();
        self.filter.reset();
        self.cycle = 0;
        self.stats = PrefetchStats::default();
    }

    fn cache_operate(&mut self, access: &CacheAccess) -> u32 {
        let _ = self.ftq.push(access.addr, access.ip, false);
        if !access.hit {
            self.filter.misses.record_miss(access.addr);
        } else if access.useful_prefetch {
            bump(&mut self.stats.useful);
        }
        access.metadata
    }

    fn cycle_operate<H: PrefetchHost + ?Sized>(&mut self, host: &mut H) {
        self.cycle = self.cycle.saturating_add(1);
        if self.filter.misses.maybe_reset(self.cycle) {
            bump(&mut self.stats.miss_resets);
            debug!(cycle = self.cycle, "miss counters reset");
        }

        self.scan_window();
        self.issue(host);

        if let Some(retired) = self.ftq.retire_beyond(self.lookahead_end) {
            trace!(addr = %retired.fetch_addr, "ftq head retired");
        }
    }

    fn cache_fill(&mut self, fill: &CacheFill) -> u32 {
        self.filter.evictions.mark(fill.evicted_addr, self.cycle);
        let _ = self.filter.outstanding.clear(fill.addr);
        fill.metadata
    }

    fn final_stats(&self) -> PrefetchStats {
        self.stats.clone()
    }
}
