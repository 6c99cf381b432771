//! Configuration Tests.
//!
//! Verifies default geometry, partial JSON overrides, engine selection
//! aliases and construction-time validation.

use fdip_core::common::ConfigError;
use fdip_core::core::units::prefetch::fdip::FdipPrefetcher;
use fdip_core::config::{
    BranchPredictor, Config, FdipConfig, HistoryIndirectConfig, LookaheadConfig, Prefetcher,
    TargetCacheConfig,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_config_validates() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn default_geometry() {
    let config = Config::default();
    assert_eq!(config.branch.predictor, BranchPredictor::Bipt);
    assert_eq!(config.branch.bipt.table_size, 4096);
    assert_eq!(config.branch.bipt.max_confidence, 7);
    assert_eq!(config.branch.bipt.predict_threshold, 2);
    assert_eq!(config.branch.indirect.table_size, 1024);
    assert_eq!(config.branch.indirect.max_confidence, 255);
    assert_eq!(config.branch.history.history_bits, 16);
    assert_eq!(config.branch.history.max_confidence, 3);
    assert_eq!(config.branch.history.confidence_floor, 2);

    assert_eq!(config.prefetch.prefetcher, Prefetcher::Fdip);
    assert_eq!(config.prefetch.fdip.ftq_size, 32);
    assert_eq!(config.prefetch.fdip.lookahead_start, 1);
    assert_eq!(config.prefetch.fdip.lookahead_end, 8);
    assert_eq!(config.prefetch.fdip.miss_reset_interval, 10_000);
    assert_eq!(config.prefetch.lookahead.tracker_sets, 256);
    assert_eq!(config.prefetch.lookahead.tracker_ways, 4);
    assert_eq!(config.prefetch.lookahead.degree, 3);
}

// ══════════════════════════════════════════════════════════
// 2. JSON parsing
// ══════════════════════════════════════════════════════════

#[test]
fn empty_document_is_all_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.branch.predictor, BranchPredictor::Bipt);
    assert_eq!(config.prefetch.fdip.degree, 2);
}

#[test]
fn partial_section_keeps_sibling_defaults() {
    let json = r#"{ "prefetch": { "fdip": { "ftq_size": 64, "lookahead_end": 16 } } }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.prefetch.fdip.ftq_size, 64);
    assert_eq!(config.prefetch.fdip.lookahead_end, 16);
    assert_eq!(config.prefetch.fdip.lookahead_start, 1);
    assert_eq!(config.prefetch.fdip.buffer_size, 32);
}

#[rstest]
#[case("Bipt", BranchPredictor::Bipt)]
#[case("BIPT", BranchPredictor::Bipt)]
#[case("Indirect", BranchPredictor::Indirect)]
#[case("FDIP", BranchPredictor::Indirect)]
#[case("HistoryIndirect", BranchPredictor::HistoryIndirect)]
#[case("FIDP", BranchPredictor::HistoryIndirect)]
fn branch_predictor_names(#[case] name: &str, #[case] expected: BranchPredictor) {
    let json = format!(r#"{{ "branch": {{ "predictor": "{name}" }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().branch.predictor, expected);
}

#[rstest]
#[case("None", Prefetcher::None)]
#[case("Fdip", Prefetcher::Fdip)]
#[case("FDIP", Prefetcher::Fdip)]
#[case("StrideLookahead", Prefetcher::StrideLookahead)]
fn prefetcher_names(#[case] name: &str, #[case] expected: Prefetcher) {
    let json = format!(r#"{{ "prefetch": {{ "prefetcher": "{name}" }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().prefetch.prefetcher, expected);
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        Config::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn unknown_predictor_is_a_parse_error() {
    let json = r#"{ "branch": { "predictor": "Perceptron" } }"#;
    assert!(matches!(Config::from_json(json), Err(ConfigError::Parse(_))));
}

#[test]
fn from_json_validates() {
    let json = r#"{ "prefetch": { "lookahead": { "degree": 0 } } }"#;
    assert!(matches!(
        Config::from_json(json),
        Err(ConfigError::ZeroDegree { .. })
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

#[test]
fn zero_sized_target_cache_rejected() {
    let config = TargetCacheConfig {
        table_size: 0,
        ..TargetCacheConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroSized { .. })
    ));
}

#[test]
fn unreachable_threshold_rejected() {
    let config = TargetCacheConfig {
        predict_threshold: 7,
        ..TargetCacheConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Threshold {
            threshold: 7,
            max: 7
        })
    ));
}

#[rstest]
#[case(0)]
#[case(65)]
fn history_width_out_of_range_rejected(#[case] bits: u32) {
    let config = HistoryIndirectConfig {
        history_bits: bits,
        ..HistoryIndirectConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FieldWidth { width, .. }) if width == bits
    ));
}

#[test]
fn floor_above_maximum_rejected() {
    let config = HistoryIndirectConfig {
        confidence_floor: 4,
        ..HistoryIndirectConfig::default()
    };
    assert!(config.validate().is_err());
}

#[rstest]
#[case(0, 8)]
#[case(4, 4)]
#[case(6, 2)]
fn bad_lookahead_window_rejected(#[case] start: usize, #[case] end: usize) {
    let config = FdipConfig {
        lookahead_start: start,
        lookahead_end: end,
        ..FdipConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::LookaheadWindow { .. })
    ));
}

#[test]
fn window_past_ftq_rejected() {
    let config = FdipConfig {
        ftq_size: 4,
        lookahead_end: 8,
        ..FdipConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WindowExceedsFtq {
            end: 8,
            ftq_size: 4
        })
    ));
}

#[test]
fn window_ending_at_ftq_capacity_rejected() {
    let config = FdipConfig {
        ftq_size: 8,
        lookahead_end: 8,
        ..FdipConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WindowExceedsFtq {
            end: 8,
            ftq_size: 8
        })
    ));
    assert!(FdipPrefetcher::new(&config).is_err());
}

#[test]
fn window_ending_below_ftq_capacity_accepted() {
    let config = FdipConfig {
        ftq_size: 9,
        lookahead_end: 8,
        ..FdipConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn zero_fdip_degree_rejected() {
    let config = FdipConfig {
        degree: 0,
        ..FdipConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroDegree { .. })
    ));
}

#[test]
fn empty_tracker_rejected() {
    let config = LookaheadConfig {
        tracker_ways: 0,
        ..LookaheadConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroSized { .. })
    ));
}

#[test]
fn error_messages_name_the_problem() {
    let err = ConfigError::WindowExceedsFtq {
        end: 8,
        ftq_size: 4,
    };
    assert_eq!(
        err.to_string(),
        "lookahead window end 8 must be below FTQ capacity 4"
    );
}
