//! Branch target prediction unit (BRU) implementations.
//!
//! This module contains the tagged target cache family: the shared candidate
//! storage, the global history register, and three predictor variants built on
//! them (tagged, indirect-only, and history-augmented indirect).

pub use self::branch_predictor::{BranchPredictor, BranchType};

/// Branch predictor trait and branch classes.
pub mod branch_predictor;

/// Tagged target cache trained on every branch.
pub mod bipt;

/// Global history shift register.
pub mod history;

/// History-indexed, history-matched indirect predictor.
pub mod history_indirect;

/// Target cache restricted to indirect branches.
pub mod indirect;

/// Shared tagged candidate storage.
pub mod target_cache;

use self::{
    bipt::BiptPredictor, history_indirect::HistoryIndirectPredictor, indirect::IndirectPredictor,
};
use crate::common::addr::Address;
use crate::common::error::ConfigError;
use crate::config::{BranchPredictor as BpType, Config};
use crate::stats::PredictorStats;

/// Enum wrapper for static dispatch of the target predictors.
/// This avoids vtable lookups on the per-fetch prediction path.
#[derive(Clone, Debug)]
pub enum BranchPredictorWrapper {
    /// Tagged target cache.
    Bipt(BiptPredictor),
    /// Indirect-only target cache.
    Indirect(IndirectPredictor),
    /// History-augmented indirect predictor.
    HistoryIndirect(HistoryIndirectPredictor),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the selected predictor's geometry is unusable.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let branch = &config.branch;
        Ok(match branch.predictor {
            BpType::Bipt => Self::Bipt(BiptPredictor::new(&branch.bipt)?),
            BpType::Indirect => Self::Indirect(IndirectPredictor::new(&branch.indirect)?),
            BpType::HistoryIndirect => {
                Self::HistoryIndirect(HistoryIndirectPredictor::new(&branch.history)?)
            }
        })
    }

    /// Short display name of the wrapped predictor.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bipt(_) => "BIPT",
            Self::Indirect(_) => "INDIRECT",
            Self::HistoryIndirect(_) => "HISTORY-INDIRECT",
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn initialize(&mut self) {
        match self {
            Self::Bipt(bp) => bp.initialize(),
            Self::Indirect(bp) => bp.initialize(),
            Self::HistoryIndirect(bp) => bp.initialize(),
        }
    }

    #[inline(always)]
    fn predict_branch(&self, ip: Address) -> bool {
        match self {
            Self::Bipt(bp) => bp.predict_branch(ip),
            Self::Indirect(bp) => bp.predict_branch(ip),
            Self::HistoryIndirect(bp) => bp.predict_branch(ip),
        }
    }

    #[inline(always)]
    fn last_branch_result(
        &mut self,
        ip: Address,
        target: Address,
        taken: bool,
        branch_type: BranchType,
    ) {
        match self {
            Self::Bipt(bp) => bp.last_branch_result(ip, target, taken, branch_type),
            Self::Indirect(bp) => bp.last_branch_result(ip, target, taken, branch_type),
            Self::HistoryIndirect(bp) => bp.last_branch_result(ip, target, taken, branch_type),
        }
    }

    fn final_stats(&self) -> PredictorStats {
        match self {
            Self::Bipt(bp) => bp.final_stats(),
            Self::Indirect(bp) => bp.final_stats(),
            Self::HistoryIndirect(bp) => bp.final_stats(),
        }
    }
}
