//! Indirect Target Cache Predictor.
//!
//! A target cache specialised for register-target branches. Only indirect jumps
//! and indirect calls populate candidates; every other class just advances the
//! global history, which is recorded into each candidate's fingerprint but not
//! used for selection. Resolutions always reinforce, so confidence counts how
//! often a destination has been seen.

use super::branch_predictor::{BranchPredictor, BranchType};
use super::history::GlobalHistoryRegister;
use super::target_cache::{PredictorEntry, TargetCache, Training};
use crate::common::addr::Address;
use crate::common::constants::IP_ALIGN_SHIFT;
use crate::common::error::ConfigError;
use crate::config::IndirectConfig;
use crate::stats::{PredictorStats, bump};

/// Indirect target cache predictor state.
#[derive(Clone, Debug)]
pub struct IndirectPredictor {
    cache: TargetCache,
    history: GlobalHistoryRegister,
    threshold: u8,
    stats: PredictorStats,
}

impl IndirectPredictor {
    /// Creates a predictor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is unusable.
    pub fn new(config: &IndirectConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &IndirectConfig) -> Self {
        Self {
            cache: TargetCache::new(config.table_size, config.tag_bits, config.max_confidence),
            history: GlobalHistoryRegister::new(config.history_bits),
            threshold: config.predict_threshold,
            stats: PredictorStats::default(),
        }
    }

    #[inline(always)]
    const fn index(ip: Address) -> u64 {
        ip.slice_upper(IP_ALIGN_SHIFT)
    }

    /// Returns the slot owned by `ip`, if one is allocated.
    pub fn probe(&self, ip: Address) -> Option<&PredictorEntry> {
        self.cache.lookup(Self::index(ip), self.cache.tag_of(ip))
    }

    /// Current global history.
    pub const fn history(&self) -> &GlobalHistoryRegister {
        &self.history
    }
}

impl Default for IndirectPredictor {
    fn default() -> Self {
        Self::build(&IndirectConfig::default())
    }
}

impl BranchPredictor for IndirectPredictor {
    fn initialize(&mut self) {
        self.cache.reset();
        self.history.reset();
        self.stats = PredictorStats::default();
    }

    fn predict_branch(&self, ip: Address) -> bool {
        self.probe(ip).is_some_and(|e| e.any_above(self.threshold))
    }

    fn last_branch_result(
        &mut self,
        ip: Address,
        target: Address,
        taken: bool,
        branch_type: BranchType,
    ) {
        self.history.push(taken);

        if !branch_type.is_indirect() || target.is_null() {
            bump(&mut self.stats.ignored);
            return;
        }

        bump(&mut self.stats.updates);
        let tag = self.cache.tag_of(ip);
        self.cache.train(
            Self::index(ip),
            tag,
            target,
            self.history.value(),
            Training::Reinforce,
            &mut self.stats,
        );
    }

    fn final_stats(&self) -> PredictorStats {
        self.stats.clone()
    }
}
