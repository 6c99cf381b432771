//! History-Augmented Indirect Predictor.
//!
//! The most selective target-cache variant. Slots are indexed by the
//! instruction pointer folded with the global history, so the same indirect
//! branch reached along different paths occupies different slots. Within a
//! slot, each candidate remembers the history present at its last
//! reinforcement, and selection favours the candidate whose confidence and
//! fingerprint agreement together score highest.
//!
//! The history register advances on every resolved branch. The outcome is
//! shifted in first, and the slot index and stored fingerprint use the
//! updated history.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) for both `predict_branch()` and `last_branch_result()`
//! - **Space Complexity:** O(T × W) where T is the table size (4096 by default)
//! - **Best Case:** Polymorphic call sites whose destination correlates with recent path
//! - **Worst Case:** Destinations independent of history (slots dilute across paths)

use tracing::trace;

use super::branch_predictor::{BranchPredictor, BranchType};
use super::history::GlobalHistoryRegister;
use super::target_cache::{PredictorEntry, TargetCache, Training};
use crate::common::addr::Address;
use crate::common::constants::IP_ALIGN_SHIFT;
use crate::common::error::ConfigError;
use crate::config::HistoryIndirectConfig;
use crate::stats::{PredictorStats, bump};

/// History-augmented indirect predictor state.
#[derive(Clone, Debug)]
pub struct HistoryIndirectPredictor {
    /// Candidate storage.
    cache: TargetCache,
    /// Global history register.
    history: GlobalHistoryRegister,
    /// Minimum confidence of a selected candidate.
    floor: u8,
    /// Training counters.
    stats: PredictorStats,
}

impl HistoryIndirectPredictor {
    /// Creates a predictor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is unusable.
    pub fn new(config: &HistoryIndirectConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &HistoryIndirectConfig) -> Self {
        Self {
            cache: TargetCache::new(config.table_size, config.tag_bits, config.max_confidence),
            history: GlobalHistoryRegister::new(config.history_bits),
            floor: config.confidence_floor,
            stats: PredictorStats::default(),
        }
    }

    /// Slot index for an instruction pointer under a given history.
    #[inline(always)]
    const fn index(ip: Address, history: u64) -> u64 {
        ip.slice_upper(IP_ALIGN_SHIFT) ^ history
    }

    /// Returns the slot `ip` maps to under the current history, if allocated.
    pub fn probe(&self, ip: Address) -> Option<&PredictorEntry> {
        self.cache
            .lookup(Self::index(ip, self.history.value()), self.cache.tag_of(ip))
    }

    /// Returns the slot index of the candidate selected for `ip` under the current history.
    pub fn selected_way(&self, ip: Address) -> Option<usize> {
        self.probe(ip).and_then(|e| {
            e.best_history_match(self.history.value(), self.history.width(), self.floor)
        })
    }

    /// Current global history.
    pub const fn history(&self) -> &GlobalHistoryRegister {
        &self.history
    }
}

impl Default for HistoryIndirectPredictor {
    fn default() -> Self {
        Self::build(&HistoryIndirectConfig::default())
    }
}

impl BranchPredictor for HistoryIndirectPredictor {
    fn initialize(&mut self) {
        self.cache.reset();
        self.history.reset();
        self.stats = PredictorStats::default();
    }

    fn predict_branch(&self, ip: Address) -> bool {
        self.selected_way(ip).is_some()
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
        let history = self.history.value();
        let index = Self::index(ip, history);
        trace!(ip = %ip, target = %target, history, "training history-indexed slot");
        let tag = self.cache.tag_of(ip);
        self.cache.train(
            index,
            tag,
            target,
            history,
            Training::Reinforce,
            &mut self.stats,
        );
    }

    fn final_stats(&self) -> PredictorStats {
        self.stats.clone()
    }
}
