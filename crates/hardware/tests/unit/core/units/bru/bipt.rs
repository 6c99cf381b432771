//! Tagged Target Cache Predictor Tests.
//!
//! Verifies confidence thresholding, taken/not-taken training, null-target
//! filtering and reinitialization of the baseline predictor.

use fdip_core::common::Address;
use fdip_core::config::TargetCacheConfig;
use fdip_core::core::units::bru::bipt::BiptPredictor;
use fdip_core::core::units::bru::{BranchPredictor, BranchType};
use rstest::rstest;

const IP: Address = Address::new(0x40_0100);
const TARGET: Address = Address::new(0x40_8000);

fn resolve(bp: &mut BiptPredictor, taken: bool, times: usize) {
    for _ in 0..times {
        bp.last_branch_result(IP, TARGET, taken, BranchType::Indirect);
    }
}

// ══════════════════════════════════════════════════════════
// 1. Prediction threshold
// ══════════════════════════════════════════════════════════

#[test]
fn cold_predictor_does_not_predict() {
    let bp = BiptPredictor::default();
    assert!(!bp.predict_branch(IP));
}

#[rstest]
#[case(1, false)]
#[case(2, false)]
#[case(3, true)]
#[case(10, true)]
fn predicts_once_confidence_exceeds_threshold(#[case] taken: usize, #[case] expected: bool) {
    let mut bp = BiptPredictor::default();
    resolve(&mut bp, true, taken);
    assert_eq!(bp.predict_branch(IP), expected);
}

#[test]
fn custom_threshold_is_honoured() {
    let mut bp = BiptPredictor::new(&TargetCacheConfig {
        predict_threshold: 0,
        ..TargetCacheConfig::default()
    })
    .unwrap();
    resolve(&mut bp, true, 1);
    assert!(bp.predict_branch(IP));
}

// ══════════════════════════════════════════════════════════
// 2. Training
// ══════════════════════════════════════════════════════════

#[test]
fn not_taken_weakens_confidence() {
    let mut bp = BiptPredictor::default();
    resolve(&mut bp, true, 3);
    resolve(&mut bp, false, 1);
    assert!(!bp.predict_branch(IP));
    assert_eq!(bp.probe(IP).unwrap().candidates[0].confidence, 2);
    assert_eq!(bp.final_stats().weakenings, 1);
}

#[test]
fn confidence_saturates_at_configured_maximum() {
    let mut bp = BiptPredictor::default();
    resolve(&mut bp, true, 50);
    assert_eq!(
        bp.probe(IP).unwrap().candidates[0].confidence,
        bp.max_confidence()
    );
}

#[rstest]
#[case(BranchType::Conditional)]
#[case(BranchType::DirectCall)]
#[case(BranchType::Return)]
fn trains_on_every_branch_class(#[case] class: BranchType) {
    let mut bp = BiptPredictor::default();
    bp.last_branch_result(IP, TARGET, true, class);
    assert!(bp.probe(IP).is_some());
    assert_eq!(bp.final_stats().updates, 1);
}

#[test]
fn null_target_is_ignored() {
    let mut bp = BiptPredictor::default();
    bp.last_branch_result(IP, Address::NULL, true, BranchType::Indirect);
    assert!(bp.probe(IP).is_none());
    let stats = bp.final_stats();
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.updates, 0);
}

#[test]
fn initialize_forgets_everything() {
    let mut bp = BiptPredictor::default();
    resolve(&mut bp, true, 5);
    bp.initialize();
    assert!(!bp.predict_branch(IP));
    assert_eq!(bp.final_stats().updates, 0);
}
