//! Indirect Target Cache Tests.
//!
//! Verifies that only indirect branches populate candidates, that every
//! branch advances the global history, and that fingerprints record the
//! history after the resolving branch.

use fdip_core::common::Address;
use fdip_core::core::units::bru::indirect::IndirectPredictor;
use fdip_core::core::units::bru::{BranchPredictor, BranchType};
use rstest::rstest;

const IP: Address = Address::new(0x40_0200);
const TARGET: Address = Address::new(0x41_0000);

#[test]
fn single_indirect_resolution_predicts() {
    let mut bp = IndirectPredictor::default();
    assert!(!bp.predict_branch(IP));
    bp.last_branch_result(IP, TARGET, true, BranchType::IndirectCall);
    assert!(bp.predict_branch(IP));
}

#[rstest]
#[case(BranchType::Conditional)]
#[case(BranchType::DirectJump)]
#[case(BranchType::DirectCall)]
#[case(BranchType::Return)]
#[case(BranchType::Other)]
fn direct_classes_do_not_train(#[case] class: BranchType) {
    let mut bp = IndirectPredictor::default();
    bp.last_branch_result(IP, TARGET, true, class);
    assert!(bp.probe(IP).is_none());
    assert_eq!(bp.final_stats().ignored, 1);
}

#[test]
fn every_branch_advances_history() {
    let mut bp = IndirectPredictor::default();
    bp.last_branch_result(IP, TARGET, true, BranchType::Conditional);
    bp.last_branch_result(IP, TARGET, false, BranchType::Conditional);
    bp.last_branch_result(IP, TARGET, true, BranchType::Indirect);
    assert_eq!(bp.history().value(), 0b101);
}

#[test]
fn fingerprint_is_history_after_resolution() {
    let mut bp = IndirectPredictor::default();
    bp.last_branch_result(IP, TARGET, true, BranchType::Conditional);
    bp.last_branch_result(IP, TARGET, true, BranchType::Indirect);
    let candidate = bp.probe(IP).unwrap().candidates[0];
    assert_eq!(candidate.history, 0b11);
    assert_eq!(candidate.history, bp.history().value());
}

#[test]
fn repeated_destinations_accumulate_confidence() {
    let mut bp = IndirectPredictor::default();
    for _ in 0..300 {
        bp.last_branch_result(IP, TARGET, true, BranchType::Indirect);
    }
    assert_eq!(bp.probe(IP).unwrap().candidates[0].confidence, 255);
}

#[test]
fn polymorphic_site_keeps_up_to_four_targets() {
    let mut bp = IndirectPredictor::default();
    for i in 1..=4 {
        bp.last_branch_result(IP, Address::new(0x1000 * i), true, BranchType::Indirect);
    }
    let entry = bp.probe(IP).unwrap();
    assert!(entry.candidates.iter().all(|c| c.confidence == 1));
    assert_eq!(bp.final_stats().installs, 4);
}

#[test]
fn null_target_is_ignored() {
    let mut bp = IndirectPredictor::default();
    bp.last_branch_result(IP, Address::NULL, true, BranchType::Indirect);
    assert!(bp.probe(IP).is_none());
    assert_eq!(bp.history().value(), 1);
}

#[test]
fn initialize_clears_history_and_table() {
    let mut bp = IndirectPredictor::default();
    bp.last_branch_result(IP, TARGET, true, BranchType::Indirect);
    bp.initialize();
    assert_eq!(bp.history().value(), 0);
    assert!(!bp.predict_branch(IP));
}
