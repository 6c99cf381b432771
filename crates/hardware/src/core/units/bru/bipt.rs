//! Tagged Target Cache Predictor.
//!
//! The baseline target-cache predictor. Every resolved branch trains the slot
//! selected by its instruction pointer: taken resolutions reinforce the
//! destination's candidate, not-taken resolutions weaken it. A prediction is
//! made when any candidate for the branch is more confident than the threshold.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) for both `predict_branch()` and `last_branch_result()`
//! - **Space Complexity:** O(T × W) where T is the table size (4096 by default)
//! - **Best Case:** Indirect branches with a few stable, frequently taken destinations
//! - **Worst Case:** Heavy aliasing on the index, which keeps reallocating slots

use super::branch_predictor::{BranchPredictor, BranchType};
use super::target_cache::{PredictorEntry, TargetCache, Training};
use crate::common::addr::Address;
use crate::common::constants::IP_ALIGN_SHIFT;
use crate::common::error::ConfigError;
use crate::config::TargetCacheConfig;
use crate::stats::{PredictorStats, bump};

/// Tagged target cache predictor state.
#[derive(Clone, Debug)]
pub struct BiptPredictor {
    /// Candidate storage.
    cache: TargetCache,
    /// Confidence a candidate must exceed to predict.
    threshold: u8,
    /// Training counters.
    stats: PredictorStats,
}

impl BiptPredictor {
    /// Creates a predictor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is unusable.
    pub fn new(config: &TargetCacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &TargetCacheConfig) -> Self {
        Self {
            cache: TargetCache::new(config.table_size, config.tag_bits, config.max_confidence),
            threshold: config.predict_threshold,
            stats: PredictorStats::default(),
        }
    }

    /// Slot index for an instruction pointer.
    #[inline(always)]
    const fn index(ip: Address) -> u64 {
        ip.slice_upper(IP_ALIGN_SHIFT)
    }

    /// Returns the slot owned by `ip`, if one is allocated.
    pub fn probe(&self, ip: Address) -> Option<&PredictorEntry> {
        self.cache.lookup(Self::index(ip), self.cache.tag_of(ip))
    }

    /// Candidate confidence ceiling.
    pub const fn max_confidence(&self) -> u8 {
        self.cache.max_confidence()
    }
}

impl Default for BiptPredictor {
    fn default() -> Self {
        Self::build(&TargetCacheConfig::default())
    }
}

impl BranchPredictor for BiptPredictor {
    fn initialize(&mut self) {
        self.cache.reset();
        self.stats = PredictorStats::default();
    }

    fn predict_branch(&self, ip: Address) -> bool {
        self.probe(ip).is_some_and(|e| e.any_above(self.threshold))
    }

    /// Trains on every branch class; a null target is never tracked.
    fn last_branch_result(
        &mut self,
        ip: Address,
        target: Address,
        taken: bool,
        _branch_type: BranchType,
    ) {
        if target.is_null() {
            bump(&mut self.stats.ignored);
            return;
        }

        bump(&mut self.stats.updates);
        let training = if taken {
            Training::Reinforce
        } else {
            Training::Weaken
        };
        let tag = self.cache.tag_of(ip);
        self.cache
            .train(Self::index(ip), tag, target, 0, training, &mut self.stats);
    }

    fn final_stats(&self) -> PredictorStats {
        self.stats.clone()
    }
}
