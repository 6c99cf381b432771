//! Instruction prefetcher implementations.
//!
//! This module contains the host-facing interface of the instruction prefetch
//! engines and the two engines themselves:
//! 1. **Fetch-directed:** Scans a fetch target queue ahead of the fetch unit and
//!    prefetches blocks that recent evictions and misses mark as likely to miss.
//! 2. **Stride lookahead:** Detects unit-stride streams per instruction pointer and
//!    issues a short burst of next-block prefetches.
//!
//! Engines never hold a reference to the cache they serve. The host passes
//! itself into [`Prefetcher::cycle_operate`] through the [`PrefetchHost`] trait.

/// Outstanding-prefetch buffer and bounded prefetch queue.
pub mod buffer;

/// Recently-evicted block record.
pub mod eviction;

/// Fetch-directed prefetch engine.
pub mod fdip;

/// Fetch target queue.
pub mod ftq;

/// Stride lookahead prefetch engine.
pub mod lookahead;

/// Per-set saturating miss counters.
pub mod miss_tracker;

/// LRU per-IP stride tracker.
pub mod tracker;

pub use self::fdip::FdipPrefetcher;
pub use self::lookahead::StrideLookaheadPrefetcher;

use crate::common::addr::Address;
use crate::common::data::AccessType;
use crate::common::error::ConfigError;
use crate::config::{Config, Prefetcher as PfType};
use crate::stats::PrefetchStats;

/// Services a cache level offers to the prefetcher attached to it.
pub trait PrefetchHost {
    /// Requests a prefetch of the block containing `addr`.
    ///
    /// Returns `false` when the request could not be accepted this cycle
    /// (queues full, MSHRs exhausted). Failures are transient.
    fn prefetch_line(&mut self, addr: Address, fill_this_level: bool, metadata: u32) -> bool;

    /// Fraction of miss status holding registers currently occupied, in `[0, 1]`.
    fn mshr_occupancy_ratio(&self) -> f64;

    /// Whether prefetches may cross a page boundary.
    fn virtual_prefetch(&self) -> bool;
}

/// A demand or prefetch access observed by the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheAccess {
    /// Accessed address.
    pub addr: Address,
    /// Instruction pointer that caused the access.
    pub ip: Address,
    /// Whether the access hit.
    pub hit: bool,
    /// Whether the hit landed on a block brought in by a prefetch.
    pub useful_prefetch: bool,
    /// Access class.
    pub access_type: AccessType,
    /// Opaque metadata, returned unchanged.
    pub metadata: u32,
}

impl CacheAccess {
    /// A demand miss at `addr` from `ip`.
    pub fn miss(addr: Address, ip: Address) -> Self {
        Self {
            addr,
            ip,
            ..Self::default()
        }
    }

    /// A demand hit at `addr` from `ip`.
    pub fn hit(addr: Address, ip: Address) -> Self {
        Self {
            addr,
            ip,
            hit: true,
            ..Self::default()
        }
    }
}

/// A block installed into the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheFill {
    /// Filled address.
    pub addr: Address,
    /// Set the block landed in.
    pub set: usize,
    /// Way the block landed in.
    pub way: usize,
    /// Whether the fill answers a prefetch.
    pub prefetch: bool,
    /// Address of the displaced block, or null when nothing was evicted.
    pub evicted_addr: Address,
    /// Opaque metadata, returned unchanged.
    pub metadata: u32,
}

/// Lifecycle of an instruction prefetcher attached to a cache level.
///
/// Within one cycle the host calls `cache_operate` for every access before
/// calling `cycle_operate` once. A fill is reported before any later access
/// to the same block.
pub trait Prefetcher: Send + Sync {
    /// Returns the engine to its power-on state.
    fn initialize(&mut self);

    /// Observes one cache access. Returns `access.metadata` unchanged.
    fn cache_operate(&mut self, access: &CacheAccess) -> u32;

    /// Advances the engine by one cycle, issuing prefetches through `host`.
    fn cycle_operate<H: PrefetchHost + ?Sized>(&mut self, host: &mut H);

    /// Observes one cache fill. Returns `fill.metadata` unchanged.
    fn cache_fill(&mut self, fill: &CacheFill) -> u32;

    /// Snapshot of the engine's statistics.
    fn final_stats(&self) -> PrefetchStats;
}

/// Enum wrapper for static dispatch of the prefetch engines.
#[derive(Clone, Debug)]
pub enum PrefetcherWrapper {
    /// Fetch-directed engine.
    Fdip(FdipPrefetcher),
    /// Stride lookahead engine.
    StrideLookahead(StrideLookaheadPrefetcher),
}

impl PrefetcherWrapper {
    /// Creates the engine selected by the configuration.
    ///
    /// Returns `Ok(None)` when prefetching is disabled.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the selected engine's parameters are unusable.
    pub fn new(config: &Config) -> Result<Option<Self>, ConfigError> {
        let prefetch = &config.prefetch;
        Ok(match prefetch.prefetcher {
            PfType::None => None,
            PfType::Fdip => Some(Self::Fdip(FdipPrefetcher::new(&prefetch.fdip)?)),
            PfType::StrideLookahead => Some(Self::StrideLookahead(
                StrideLookaheadPrefetcher::new(&prefetch.lookahead)?,
            )),
        })
    }

    /// Short display name of the wrapped engine.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fdip(_) => "FDIP",
            Self::StrideLookahead(_) => "STRIDE-LOOKAHEAD",
        }
    }
}

impl Prefetcher for PrefetcherWrapper {
    fn initialize(&mut self) {
        match self {
            Self::Fdip(pf) => pf.initialize(),
            Self::StrideLookahead(pf) => pf.initialize(),
        }
    }

    #[inline(always)]
    fn cache_operate(&mut self, access: &CacheAccess) -> u32 {
        match self {
            Self::Fdip(pf) => pf.cache_operate(access),
            Self::StrideLookahead(pf) => pf.cache_operate(access),
        }
    }

    #[inline(always)]
    fn cycle_operate<H: PrefetchHost + ?Sized>(&mut self, host: &mut H) {
        match self {
            Self::Fdip(pf) => pf.cycle_operate(host),
            Self::StrideLookahead(pf) => pf.cycle_operate(host),
        }
    }

    #[inline(always)]
    fn cache_fill(&mut self, fill: &CacheFill) -> u32 {
        match self {
            Self::Fdip(pf) => pf.cache_fill(fill),
            Self::StrideLookahead(pf) => pf.cache_fill(fill),
        }
    }

    fn final_stats(&self) -> PrefetchStats {
        match self {
            Self::Fdip(pf) => pf.final_stats(),
            Self::StrideLookahead(pf) => pf.final_stats(),
        }
    }
}
