//! History-Augmented Indirect Predictor Tests.
//!
//! Verifies that slots are selected by IP and global history, that the
//! confidence floor gates predictions, and that training uses the history
//! after the branch's own outcome is shifted in.

use fdip_core::common::Address;
use fdip_core::config::HistoryIndirectConfig;
use fdip_core::core::units::bru::history_indirect::HistoryIndirectPredictor;
use fdip_core::core::units::bru::{BranchPredictor, BranchType};

const IP: Address = Address::new(0x40_0300);
const TARGET: Address = Address::new(0x42_0000);

/// Resolves the indirect branch as not taken, which leaves a zero history at zero.
fn train_at_zero_history(bp: &mut HistoryIndirectPredictor, target: Address, times: usize) {
    for _ in 0..times {
        bp.last_branch_result(IP, target, false, BranchType::Indirect);
    }
}

#[test]
fn floor_gates_prediction() {
    let mut bp = HistoryIndirectPredictor::default();
    train_at_zero_history(&mut bp, TARGET, 1);
    assert!(!bp.predict_branch(IP));
    train_at_zero_history(&mut bp, TARGET, 1);
    assert!(bp.predict_branch(IP));
    assert_eq!(bp.selected_way(IP), Some(0));
}

#[test]
fn different_path_maps_to_different_slot() {
    let mut bp = HistoryIndirectPredictor::default();
    train_at_zero_history(&mut bp, TARGET, 3);
    assert!(bp.predict_branch(IP));

    bp.last_branch_result(Address::new(0x40_0400), TARGET, true, BranchType::Conditional);
    assert_eq!(bp.history().value(), 1);
    assert!(!bp.predict_branch(IP));
}

#[test]
fn training_uses_history_after_outcome() {
    let mut bp = HistoryIndirectPredictor::default();
    // Resolved taken under history 0; the slot is keyed by the updated history 1.
    bp.last_branch_result(IP, TARGET, true, BranchType::Indirect);
    assert_eq!(bp.history().value(), 1);
    let candidate = bp.probe(IP).unwrap().candidates[0];
    assert_eq!(candidate.target, TARGET);
    assert_eq!(candidate.confidence, 1);
    assert_eq!(candidate.history, 1);

    // Shift the taken outcome out of the 16-bit register; history 0 maps elsewhere.
    for _ in 0..16 {
        bp.last_branch_result(IP, TARGET, false, BranchType::Conditional);
    }
    assert_eq!(bp.history().value(), 0);
    assert!(bp.probe(IP).is_none());
}

#[test]
fn confidence_saturates_at_three() {
    let mut bp = HistoryIndirectPredictor::default();
    train_at_zero_history(&mut bp, TARGET, 10);
    assert_eq!(bp.probe(IP).unwrap().candidates[0].confidence, 3);
}

#[test]
fn stronger_candidate_is_selected() {
    let mut bp = HistoryIndirectPredictor::default();
    let other = Address::new(0x43_0000);
    train_at_zero_history(&mut bp, other, 2);
    train_at_zero_history(&mut bp, TARGET, 3);
    assert_eq!(bp.selected_way(IP), Some(1));
}

#[test]
fn lower_floor_predicts_sooner() {
    let mut bp = HistoryIndirectPredictor::new(&HistoryIndirectConfig {
        confidence_floor: 1,
        ..HistoryIndirectConfig::default()
    })
    .unwrap();
    train_at_zero_history(&mut bp, TARGET, 1);
    assert!(bp.predict_branch(IP));
}

#[test]
fn direct_branches_only_advance_history() {
    let mut bp = HistoryIndirectPredictor::default();
    bp.last_branch_result(IP, TARGET, true, BranchType::DirectJump);
    bp.last_branch_result(IP, TARGET, true, BranchType::Conditional);
    assert_eq!(bp.history().value(), 0b11);
    assert_eq!(bp.final_stats().ignored, 2);
    assert_eq!(bp.final_stats().updates, 0);
}
