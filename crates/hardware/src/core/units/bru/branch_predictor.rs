//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that every target predictor
//! implements, and the branch classes reported to it on resolution. The host
//! drives the four callbacks; predictors hold no reference back to the host.

use serde::{Deserialize, Serialize};

use crate::common::addr::Address;
use crate::stats::PredictorStats;

/// Control-flow class of a resolved branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchType {
    /// Not a branch.
    #[default]
    NotBranch,
    /// Unconditional direct jump.
    DirectJump,
    /// Indirect jump (register target).
    Indirect,
    /// Conditional direct branch.
    Conditional,
    /// Direct call.
    DirectCall,
    /// Indirect call (register target).
    IndirectCall,
    /// Function return.
    Return,
    /// Any other control transfer.
    Other,
}

impl BranchType {
    /// Returns true for the register-target classes tracked by the indirect predictors.
    #[inline(always)]
    pub const fn is_indirect(self) -> bool {
        matches!(self, Self::Indirect | Self::IndirectCall)
    }
}

/// Trait for branch target predictors.
///
/// Predictions are a confidence signal only: `predict_branch` never exposes a
/// destination address.
pub trait BranchPredictor {
    /// Returns the predictor to its power-on state.
    ///
    /// Called once by the host before the first branch; may be called again to
    /// restart a run.
    fn initialize(&mut self);

    /// Reports whether the predictor holds a confident target for `ip`.
    ///
    /// # Arguments
    ///
    /// * `ip` - Address of the branch instruction being fetched.
    fn predict_branch(&self, ip: Address) -> bool;

    /// Trains the predictor with a resolved branch.
    ///
    /// # Arguments
    ///
    /// * `ip` - Address of the branch instruction.
    /// * `target` - Resolved destination.
    /// * `taken` - Whether the branch was taken.
    /// * `branch_type` - Control-flow class of the branch.
    fn last_branch_result(
        &mut self,
        ip: Address,
        target: Address,
        taken: bool,
        branch_type: BranchType,
    );

    /// Returns the end-of-run training statistics.
    fn final_stats(&self) -> PredictorStats;
}
