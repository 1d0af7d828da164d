//! Architectural Contract Test: Cross-Family Aggregation
//!
//! This test verifies the operations that answer for the whole collection
//! by combining both engines.
//!
//! Constraints verified:
//! - Total count is the sum of both engines' counts after any mutation
//! - Recalculated count matches the maintained count without concurrent writes
//! - Prefix layouts are returned per family, never merged
//! - A per-family layout error is discarded by the best-effort layout and
//!   surfaced by the strict layout
//! - Removing an absent network returns the engine's error unchanged
//!
//! If this test fails, whole-collection answers are wrong.

mod common;

use common::*;
use ranger_core::error::Error;
use ranger_core::net::IpFamily;
use ranger_core::{PrefixCounts, VersionedRouter};
use std::sync::atomic::Ordering;

#[test]
fn total_count_is_additive_across_mutations() {
    let (router, _factory) = recording_router();

    type Step = Box<dyn Fn(&VersionedRouter<Entry>)>;
    let steps: Vec<Step> = vec![
        Box::new(|r: &VersionedRouter<Entry>| r.insert(entry("10.0.0.0/8", "a")).unwrap()),
        Box::new(|r: &VersionedRouter<Entry>| r.insert(entry("2001:db8::/32", "b")).unwrap()),
        Box::new(|r: &VersionedRouter<Entry>| r.insert(entry("192.168.0.0/16", "c")).unwrap()),
        Box::new(|r: &VersionedRouter<Entry>| r.insert(entry("10.0.0.0/8", "a-again")).unwrap()),
        Box::new(|r: &VersionedRouter<Entry>| {
            r.remove("2001:db8::/32").unwrap();
        }),
        Box::new(|r: &VersionedRouter<Entry>| r.insert_with_merge(entry("fd00::/8", "d")).unwrap()),
        Box::new(|r: &VersionedRouter<Entry>| {
            // Absent network: the engine's error leaves counts alone
            let _ = r.remove("172.16.0.0/12");
        }),
    ];

    for step in steps {
        step(&router);
        assert_eq!(
            router.len(),
            router.family_len(IpFamily::V4) + router.family_len(IpFamily::V6)
        );
    }

    assert_eq!(router.family_len(IpFamily::V4), 2);
    assert_eq!(router.family_len(IpFamily::V6), 1);
    assert_eq!(router.len(), 3);
}

#[test]
fn recalculated_count_matches_maintained_count() {
    let (router, factory) = recording_router();

    router.insert(entry("10.0.0.0/8", "a")).unwrap();
    router.insert(entry("10.1.0.0/16", "b")).unwrap();
    router.insert(entry("2001:db8::/32", "c")).unwrap();
    router.remove("10.1.0.0/16").unwrap();

    assert_eq!(router.recalculate_len(), router.len());
    assert_eq!(router.recalculate_len(), 2);

    // Recalculation asks both engines
    assert_eq!(EngineCalls::get(&factory.v4.recalculate_len), 2);
    assert_eq!(EngineCalls::get(&factory.v6.recalculate_len), 2);
}

#[test]
fn aggregation_reads_do_not_mutate_entries() {
    let (router, _factory) = recording_router();
    router.insert(entry("10.0.0.0/8", "a")).unwrap();
    router.insert(entry("2001:db8::/32", "b")).unwrap();

    let before = router.prefix_layout();
    let _ = router.len();
    let _ = router.recalculate_len();
    let _ = router.try_prefix_layout();

    assert_eq!(router.prefix_layout(), before);
    assert!(router.contains("10.1.1.1").unwrap());
    assert!(router.contains("2001:db8::1").unwrap());
}

#[test]
fn prefix_layouts_are_independent_per_family() {
    let (router, _factory) = recording_router();
    router.insert(entry("192.0.2.0/24", "v4")).unwrap();
    router.insert(entry("2001:db8::/64", "v6")).unwrap();

    let layout = router.prefix_layout();
    assert_eq!(layout.ipv4, PrefixCounts::from([(24, 1)]));
    assert_eq!(layout.ipv6, PrefixCounts::from([(64, 1)]));
}

#[test]
fn same_prefix_length_is_not_combined_across_families() {
    let (router, _factory) = recording_router();
    router.insert(entry("198.51.100.0/24", "v4")).unwrap();
    router.insert(entry("2001:db8::/24", "v6")).unwrap();

    let layout = router.prefix_layout();
    assert_eq!(layout.get(IpFamily::V4), &PrefixCounts::from([(24, 1)]));
    assert_eq!(layout.get(IpFamily::V6), &PrefixCounts::from([(24, 1)]));
}

#[test]
fn best_effort_layout_discards_engine_errors() {
    let (router, factory) = recording_router();
    router.insert(entry("192.0.2.0/24", "v4")).unwrap();
    router.insert(entry("2001:db8::/64", "v6")).unwrap();

    factory.v6.fail_layout.store(true, Ordering::SeqCst);

    let layout = router.prefix_layout();
    assert_eq!(layout.ipv4, PrefixCounts::from([(24, 1)]));
    assert!(layout.ipv6.is_empty());

    // The strict variant reports the same failure
    let err = router.try_prefix_layout().unwrap_err();
    assert!(matches!(err, Error::Engine { family: IpFamily::V6, .. }));
}

#[test]
fn removing_absent_network_returns_engine_error_unchanged() {
    let (router, factory) = recording_router();
    router.insert(entry("10.0.0.0/8", "a")).unwrap();
    router.insert(entry("2001:db8::/32", "b")).unwrap();

    let err = router.remove("10.0.0.0/16").unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert_eq!(err.to_string(), "Network not found: 10.0.0.0/16");

    let err = router.remove("2001:db9::/32").unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(EngineCalls::get(&factory.v4.remove), 1);
    assert_eq!(EngineCalls::get(&factory.v6.remove), 1);
    assert_eq!(router.len(), 2);
    assert_eq!(router.recalculate_len(), 2);
}
