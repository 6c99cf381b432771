//! Stride Lookahead Prefetcher Tests.
//!
//! Verifies burst arming on two successive +1 strides from one IP, the
//! one-block-per-cycle burst, page-boundary termination, occupancy-based fill
//! level and retry on host refusal.

use fdip_core::common::Address;
use fdip_core::config::LookaheadConfig;
use fdip_core::core::units::prefetch::lookahead::{LookaheadState, StrideLookaheadPrefetcher};
use fdip_core::{CacheFill, Prefetcher};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{block, miss, run};
use crate::common::mocks::host::{MockHost, RecordingHost};

const IP: Address = Address::new(0x40_0000);
const OTHER_IP: Address = Address::new(0x40_0040);

fn access_blocks(pf: &mut StrideLookaheadPrefetcher, ip: Address, blocks: &[u64]) {
    for &n in blocks {
        miss(pf, block(n), ip);
    }
}

// ══════════════════════════════════════════════════════════
// 1. Arming
// ══════════════════════════════════════════════════════════

#[test]
fn arms_on_third_sequential_block() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101]);
    assert_eq!(pf.active(), None);

    access_blocks(&mut pf, IP, &[102]);
    assert_eq!(
        pf.active(),
        Some(&LookaheadState {
            address: block(102),
            stride: 1,
            degree: 3,
        })
    );
    assert_eq!(pf.final_stats().bursts_armed, 1);
}

#[rstest]
#[case(&[100, 102, 104])]
#[case(&[104, 103, 102])]
#[case(&[100, 100, 100])]
#[case(&[100, 101, 103])]
fn non_unit_strides_do_not_arm(#[case] blocks: &[u64]) {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, blocks);
    assert_eq!(pf.active(), None);
}

#[test]
fn strides_are_tracked_per_ip() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100]);
    access_blocks(&mut pf, OTHER_IP, &[101]);
    access_blocks(&mut pf, IP, &[102]);
    access_blocks(&mut pf, OTHER_IP, &[103]);
    assert_eq!(pf.active(), None);
    assert_eq!(pf.tracker().occupancy(), 2);
}

#[test]
fn newer_burst_replaces_older() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    access_blocks(&mut pf, OTHER_IP, &[200, 201, 202]);
    assert_eq!(pf.active().map(|s| s.address), Some(block(202)));
}

// ══════════════════════════════════════════════════════════
// 2. Burst issue
// ══════════════════════════════════════════════════════════

#[test]
fn burst_issues_degree_blocks_one_per_cycle() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    let mut host = RecordingHost::accepting();

    run(&mut pf, &mut host, 1);
    assert_eq!(host.addresses(), vec![block(103)]);
    assert_eq!(pf.active().map(|s| s.degree), Some(2));

    run(&mut pf, &mut host, 5);
    assert_eq!(host.addresses(), vec![block(103), block(104), block(105)]);
    assert_eq!(pf.active(), None);
    assert_eq!(pf.final_stats().issued, 3);
}

#[test]
fn configured_degree_sets_burst_length() {
    let mut pf = StrideLookaheadPrefetcher::new(&LookaheadConfig {
        degree: 1,
        ..LookaheadConfig::default()
    })
    .unwrap();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    let mut host = RecordingHost::accepting();
    run(&mut pf, &mut host, 4);
    assert_eq!(host.addresses(), vec![block(103)]);
}

#[rstest]
#[case(0.0, true)]
#[case(0.49, true)]
#[case(0.5, false)]
#[case(0.9, false)]
fn fill_level_follows_occupancy(#[case] occupancy: f64, #[case] fill_this_level: bool) {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    let mut host = RecordingHost {
        occupancy,
        ..RecordingHost::accepting()
    };
    run(&mut pf, &mut host, 1);
    assert_eq!(host.issued[0].fill_this_level, fill_this_level);
}

#[test]
fn refusal_retries_without_losing_degree() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    let mut host = RecordingHost::refusing();
    run(&mut pf, &mut host, 2);
    assert_eq!(pf.active().map(|s| (s.address, s.degree)), Some((block(102), 3)));
    assert_eq!(pf.final_stats().issue_failures, 2);

    host.accept = true;
    run(&mut pf, &mut host, 1);
    assert_eq!(host.addresses(), vec![block(103)]);
}

// ══════════════════════════════════════════════════════════
// 3. Page boundary
// ══════════════════════════════════════════════════════════

#[test]
fn page_crossing_terminates_without_issue() {
    let mut pf = StrideLookaheadPrefetcher::default();
    // Blocks 61..=63 end page 0; the next block starts page 1.
    access_blocks(&mut pf, IP, &[61, 62, 63]);
    assert!(pf.active().is_some());

    let mut host = MockHost::new();
    let _ = host.expect_virtual_prefetch().return_const(false);
    let _ = host.expect_prefetch_line().times(0);
    let _ = host.expect_mshr_occupancy_ratio().times(0);
    pf.cycle_operate(&mut host);

    assert_eq!(pf.active(), None);
    assert_eq!(pf.final_stats().bursts_page_cross, 1);
    assert_eq!(pf.final_stats().issued, 0);
}

#[test]
fn burst_stops_at_page_end() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[60, 61, 62]);
    let mut host = RecordingHost::accepting();
    run(&mut pf, &mut host, 3);
    assert_eq!(host.addresses(), vec![block(63)]);
    assert_eq!(pf.active(), None);
}

#[test]
fn virtual_prefetch_allows_crossing() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[61, 62, 63]);
    let mut host = RecordingHost {
        cross_page: true,
        ..RecordingHost::accepting()
    };
    run(&mut pf, &mut host, 1);
    assert_eq!(host.addresses(), vec![block(64)]);
}

// ══════════════════════════════════════════════════════════
// 4. Lifecycle
// ══════════════════════════════════════════════════════════

#[test]
fn fill_is_a_pass_through() {
    let mut pf = StrideLookaheadPrefetcher::default();
    let fill = CacheFill {
        addr: block(1),
        evicted_addr: block(2),
        metadata: 7,
        ..CacheFill::default()
    };
    assert_eq!(pf.cache_fill(&fill), 7);
}

#[test]
fn initialize_clears_tracker_and_burst() {
    let mut pf = StrideLookaheadPrefetcher::default();
    access_blocks(&mut pf, IP, &[100, 101, 102]);
    pf.initialize();
    assert_eq!(pf.active(), None);
    assert_eq!(pf.tracker().occupancy(), 0);
    access_blocks(&mut pf, IP, &[103]);
    assert_eq!(pf.active(), None);
}
