//! Collection analytics tests

use otter_g1_gc::{
    Analytics, AnalyticsState, CollectionSet, G1Config, GcTaskCause, Metric, MetricSequence,
    Predictor, Region, RegionId,
};

#[derive(Debug, Clone)]
struct TestRegion {
    id: u32,
    eden: bool,
    remset_size: usize,
    live_bytes: usize,
}

impl Region for TestRegion {
    fn id(&self) -> RegionId {
        RegionId(self.id)
    }
    fn is_eden(&self) -> bool {
        self.eden
    }
    fn remset_size(&self) -> usize {
        self.remset_size
    }
    fn live_bytes(&self) -> usize {
        self.live_bytes
    }
    fn live_objects(&self) -> usize {
        self.live_bytes / 32
    }
    fn allocated_bytes(&self) -> usize {
        64 * 1024
    }
    fn allocated_objects(&self) -> usize {
        2048
    }
}

fn eden(id: u32) -> TestRegion {
    TestRegion {
        id,
        eden: true,
        remset_size: 2,
        live_bytes: 0,
    }
}

fn old(id: u32, live_bytes: usize) -> TestRegion {
    TestRegion {
        id,
        eden: false,
        remset_size: 4,
        live_bytes,
    }
}

fn analytics() -> Analytics {
    Analytics::new(0, &G1Config::default())
}

/// Run one fully measured young collection of `eden_length` regions
///
/// The mutator runs for 1ms, then the pause is 100us of marking, 200us of
/// evacuation, 50us of reference updating and 50us of other work.
fn young_collection(analytics: &mut Analytics, start_ns: u64, eden_length: u32, cause: GcTaskCause) {
    let us = |offset: u64| start_ns + offset * 1000;
    analytics.report_collection_start(start_ns);
    analytics.report_marking_start(us(0));
    analytics.report_live_objects(100 * eden_length as usize);
    // Two chunks per eden region, five references per chunk
    analytics.report_remset_size(2 * eden_length as usize, 10 * eden_length as usize);
    analytics.report_marking_end(us(100));
    analytics.report_scan_dirty_cards_start(us(100));
    analytics.report_scan_dirty_cards_end(us(100), 0);
    analytics.report_evacuation_start(us(100));
    analytics.report_evacuated_bytes(4096 * eden_length as usize);
    analytics.report_evacuation_end(us(300));
    analytics.report_update_refs_start(us(300));
    analytics.report_update_refs_end(us(350));
    let set = CollectionSet::new((0..eden_length).map(eden));
    analytics.report_collection_end(cause, us(400), &set, false);
}

fn assert_all_finite(analytics: &Analytics) {
    for metric in Metric::ALL {
        for value in analytics.sequence(metric).iter() {
            assert!(value.is_finite(), "{} holds {value}", metric.name());
        }
    }
}

#[test]
fn test_empty_sequence_predicts_zero() {
    let sequence = MetricSequence::default();
    assert_eq!(Predictor::default().predict(&sequence), 0.0);
    assert_eq!(Predictor::new(3.0).predict(&sequence), 0.0);
}

#[test]
fn test_explicit_collection_only_samples_allocation_rate() {
    let mut analytics = analytics();
    analytics.report_collection_start(1_000_000);
    analytics.report_live_objects(500);
    analytics.report_evacuated_bytes(1 << 20);
    let set = CollectionSet::new([eden(0), eden(1)]);
    analytics.report_collection_end(GcTaskCause::Explicit, 2_000_000, &set, false);

    assert_eq!(analytics.sequence(Metric::AllocationRate).len(), 1);
    for metric in Metric::ALL
        .into_iter()
        .filter(|&metric| metric != Metric::AllocationRate)
    {
        assert!(analytics.sequence(metric).is_empty(), "{}", metric.name());
    }
    assert_eq!(analytics.previous_collection_end_ns(), 2_000_000);
    assert_eq!(analytics.state(), AnalyticsState::Idle);
}

#[test]
fn test_mixed_collection_only_samples_allocation_rate() {
    let mut analytics = analytics();
    analytics.report_collection_start(1_000_000);
    let mut set = CollectionSet::new([eden(0)]);
    set.add_region(old(10, 0));
    analytics.report_collection_end(GcTaskCause::Young, 1_500_000, &set, false);

    assert_eq!(analytics.sequence(Metric::AllocationRate).len(), 1);
    assert!(analytics.sequence(Metric::LiveObjectsPerRegion).is_empty());
    assert!(analytics.sequence(Metric::PredictionError).is_empty());
}

#[test]
fn test_zero_eden_collection_is_safe() {
    let mut analytics = analytics();
    analytics.report_collection_start(1_000_000);
    analytics.report_marking_start(1_000_000);
    analytics.report_live_objects(10);
    analytics.report_marking_end(1_000_000);
    let set: CollectionSet<TestRegion> = CollectionSet::new([]);
    analytics.report_collection_end(GcTaskCause::Young, 1_000_000, &set, true);

    assert_eq!(analytics.sequence(Metric::AllocationRate).last(), Some(0.0));
    assert!(analytics.sequence(Metric::LiveObjectsPerRegion).is_empty());
    assert!(analytics.sequence(Metric::PromotionFraction).is_empty());
    assert!(analytics.sequence(Metric::CopiedBytesPerRegion).is_empty());
    assert_all_finite(&analytics);
    assert_eq!(analytics.predict_young_collection_time_in_micros(0), 0);
    assert_eq!(analytics.predict_young_collection_time_in_micros(8), 0);
}

#[test]
fn test_back_to_back_collections_stay_finite() {
    let mut analytics = analytics();
    // Zero mutator time between the two collections
    young_collection(&mut analytics, 0, 2, GcTaskCause::Young);
    young_collection(&mut analytics, 400_000, 2, GcTaskCause::Young);
    assert_all_finite(&analytics);
    assert!(analytics.predict_allocation_rate().is_finite());
}

#[test]
fn test_steady_workload_predictions_converge() {
    let mut analytics = analytics();
    let mut start = 1_000_000;
    for _ in 0..20 {
        young_collection(&mut analytics, start, 4, GcTaskCause::Young);
        start += 400_000 + 1_000_000;
    }
    // Every rate is constant, so the prediction matches the measured pause
    assert_eq!(analytics.predict_young_collection_time_in_micros(4), 400);
    assert_eq!(analytics.estimate_prediction_error_in_micros(), 0);
    assert!((analytics.predict_allocation_rate() - 4.0 / 1000.0).abs() < 1e-12);
    let sequence = analytics.sequence(Metric::OtherTime);
    assert_eq!(sequence.len(), sequence.capacity());
}

#[test]
fn test_larger_eden_predicts_longer_pause() {
    let mut analytics = analytics();
    young_collection(&mut analytics, 1_000_000, 4, GcTaskCause::Young);
    let small = analytics.predict_young_collection_time_in_micros(2);
    let large = analytics.predict_young_collection_time_in_micros(16);
    assert!(large > small, "{large} <= {small}");
}

#[test]
fn test_threshold_collection_skips_remset_samples() {
    let mut analytics = analytics();
    young_collection(&mut analytics, 1_000_000, 2, GcTaskCause::HeapUsageThreshold);
    assert!(analytics.sequence(Metric::RemsetRefsCount).is_empty());
    assert!(analytics.sequence(Metric::RemsetRefsPerChunk).is_empty());
    assert_eq!(analytics.sequence(Metric::LiveObjectsPerRegion).last(), Some(100.0));

    young_collection(&mut analytics, 3_000_000, 2, GcTaskCause::Young);
    assert_eq!(analytics.sequence(Metric::RemsetRefsCount).last(), Some(20.0));
    assert_eq!(analytics.sequence(Metric::RemsetRefsPerChunk).last(), Some(5.0));
}

#[test]
fn test_dirty_card_scan_rate() {
    let mut analytics = analytics();
    assert_eq!(analytics.predict_scan_dirty_cards_time(1000), 0);

    analytics.report_collection_start(1_000_000);
    analytics.report_scan_dirty_cards_start(1_000_000);
    analytics.report_scan_dirty_cards_end(1_250_000, 500);
    let set = CollectionSet::new([eden(0)]);
    analytics.report_collection_end(GcTaskCause::Young, 1_300_000, &set, false);

    assert_eq!(analytics.sequence(Metric::ScanDirtyCardsRate).last(), Some(2.0));
    assert_eq!(analytics.predict_scan_dirty_cards_time(0), 0);
    assert_eq!(analytics.predict_scan_dirty_cards_time(1000), 500);
}

#[test]
fn test_promoted_regions_are_not_copied() {
    let mut analytics = analytics();
    analytics.report_collection_start(1_000_000);
    analytics.report_evacuation_start(1_000_000);
    analytics.report_promoted_region();
    analytics.report_evacuated_bytes(8192);
    analytics.report_evacuation_end(1_100_000);
    let set = CollectionSet::new([eden(0), eden(1), eden(2)]);
    analytics.report_collection_end(GcTaskCause::Young, 1_200_000, &set, false);

    let last = |metric| analytics.sequence(metric).last();
    assert_eq!(last(Metric::CopiedBytesPerRegion), Some(4096.0));
    assert!((last(Metric::PromotionFraction).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    // 100us of evacuation minus 50us for the promoted region
    assert!((last(Metric::CopyingBytesRate).unwrap() - 8192.0 / 50.0).abs() < 1e-9);
}

#[test]
fn test_old_region_prediction_uses_rates() {
    let mut analytics = analytics();
    young_collection(&mut analytics, 1_000_000, 2, GcTaskCause::Young);
    let empty = analytics.predict_old_collection_time_in_micros(0, 0, 0);
    let region = old(7, 32 * 1024);
    let full = analytics.predict_old_region_collection_time_in_micros(&region);
    assert_eq!(empty, 0);
    assert!(full > 0);
    assert_eq!(
        full,
        analytics.predict_old_collection_time_in_micros(4, 32 * 1024, 1024)
    );
}

#[test]
fn test_metrics_dump_lines() {
    let mut analytics = analytics();
    young_collection(&mut analytics, 1_000_000, 2, GcTaskCause::Young);

    analytics.report_collection_start(3_000_000);
    analytics.report_live_objects(200);
    let set = CollectionSet::new([eden(0), eden(1)]);
    let dump = analytics
        .report_collection_end(GcTaskCause::Young, 3_400_000, &set, true)
        .unwrap();
    let pause = dump.get("pause_time_us").unwrap();
    assert_eq!(pause.actual, 400.0);
    assert_eq!(pause.predicted, 400.0);
    assert_eq!(pause.error_percent(), Some(0.0));
    assert!(dump.to_string().lines().count() >= 10);
}
