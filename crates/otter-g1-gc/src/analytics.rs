//! Collection analytics
//!
//! `Analytics` turns the raw measurements of each collection into per-unit
//! rates (objects marked per microsecond, bytes copied per microsecond, ...)
//! and keeps a short history of every rate. Prediction queries combine those
//! histories to estimate the pause of a collection before it runs.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --report_collection_start--> Collecting --report_collection_end--> Idle
//! ```
//!
//! Between the two calls the driver reports phase boundaries and GC workers
//! accumulate counters concurrently through `&self` methods. The counters use
//! relaxed atomics: the worker pool join that ends each phase orders them
//! before `report_collection_end`.
//!
//! Timestamps are monotonic nanoseconds, predictions are microseconds.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collection_set::CollectionSet;
use crate::config::G1Config;
use crate::predictor::{MetricSequence, Predictor};
use crate::region::Region;
use crate::task::GcTaskCause;

const NANOS_TO_MICROS: f64 = 1000.0;
const PERCENTS: f64 = 100.0;

/// Predicted rates at or below this are treated as unknown
const MIN_PREDICTED_RATE: f64 = f64::EPSILON;

/// Metrics tracked across collections
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Eden regions allocated per microsecond of mutator time
    AllocationRate = 0,
    /// Objects and remset references marked per microsecond
    MarkingRate = 1,
    /// Bytes copied per microsecond of evacuation
    CopyingBytesRate = 2,
    /// Bytes copied out of each compacted eden region
    CopiedBytesPerRegion = 3,
    /// Objects and remset references updated per microsecond
    UpdateRefsRate = 4,
    /// Live objects found per eden region
    LiveObjectsPerRegion = 5,
    /// Fraction of eden regions promoted in place
    PromotionFraction = 6,
    /// Remembered-set references scanned per collection
    RemsetRefsCount = 7,
    /// Remembered-set references per remembered-set chunk
    RemsetRefsPerChunk = 8,
    /// Dirty cards scanned per microsecond
    ScanDirtyCardsRate = 9,
    /// Pause time not attributed to a measured phase
    OtherTime = 10,
    /// Absolute error of the young pause prediction
    PredictionError = 11,
}

impl Metric {
    /// Number of tracked metrics
    pub const COUNT: usize = 12;

    /// Every metric, in index order
    pub const ALL: [Metric; Self::COUNT] = [
        Metric::AllocationRate,
        Metric::MarkingRate,
        Metric::CopyingBytesRate,
        Metric::CopiedBytesPerRegion,
        Metric::UpdateRefsRate,
        Metric::LiveObjectsPerRegion,
        Metric::PromotionFraction,
        Metric::RemsetRefsCount,
        Metric::RemsetRefsPerChunk,
        Metric::ScanDirtyCardsRate,
        Metric::OtherTime,
        Metric::PredictionError,
    ];

    /// Name used in metric dumps
    pub fn name(self) -> &'static str {
        match self {
            Metric::AllocationRate => "allocation_rate",
            Metric::MarkingRate => "marking_rate",
            Metric::CopyingBytesRate => "copying_bytes_rate",
            Metric::CopiedBytesPerRegion => "copied_bytes_per_region",
            Metric::UpdateRefsRate => "update_refs_rate",
            Metric::LiveObjectsPerRegion => "live_objects_per_region",
            Metric::PromotionFraction => "promotion_fraction",
            Metric::RemsetRefsCount => "remset_refs_count",
            Metric::RemsetRefsPerChunk => "remset_refs_per_chunk",
            Metric::ScanDirtyCardsRate => "scan_dirty_cards_rate",
            Metric::OtherTime => "other_time",
            Metric::PredictionError => "prediction_error",
        }
    }
}

/// Whether a collection is being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsState {
    /// Between collections
    Idle,
    /// Between `report_collection_start` and `report_collection_end`
    Collecting,
}

/// Start and end of one phase, in nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PhaseSpan {
    start: u64,
    end: u64,
}

impl PhaseSpan {
    fn duration_us(&self) -> f64 {
        self.end.saturating_sub(self.start) as f64 / NANOS_TO_MICROS
    }
}

/// Snapshot of the counters of the collection in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounters {
    /// Bytes copied out of collection-set regions
    pub copied_bytes: usize,
    /// Eden regions promoted without copying
    pub promoted_regions: usize,
    /// Live objects found in collection-set regions
    pub live_objects: usize,
    /// Remembered-set chunks scanned
    pub remset_size: usize,
    /// References found in the scanned remembered sets
    pub remset_refs: usize,
    /// Dirty cards scanned
    pub dirty_cards: usize,
}

/// Collection statistics and pause-time predictions
pub struct Analytics {
    predictor: Predictor,
    promotion_time_per_region_us: f64,
    sequences: [MetricSequence; Metric::COUNT],
    state: AnalyticsState,
    previous_young_collection_end: u64,
    current_young_collection_start: u64,
    marking: PhaseSpan,
    scan_dirty_cards: PhaseSpan,
    evacuation: PhaseSpan,
    update_refs: PhaseSpan,
    dirty_cards: usize,
    // Written concurrently by GC workers
    copied_bytes: AtomicUsize,
    promoted_regions: AtomicUsize,
    live_objects: AtomicUsize,
    remset_size: AtomicUsize,
    remset_refs: AtomicUsize,
}

impl Analytics {
    /// Create analytics for a collector started at `now_ns`
    pub fn new(now_ns: u64, config: &G1Config) -> Self {
        Self {
            predictor: Predictor::new(config.predictor_confidence_factor),
            promotion_time_per_region_us: config.promotion_time_per_region_us,
            sequences: std::array::from_fn(|_| MetricSequence::new(config.sequence_capacity)),
            state: AnalyticsState::Idle,
            previous_young_collection_end: now_ns,
            current_young_collection_start: now_ns,
            marking: PhaseSpan::default(),
            scan_dirty_cards: PhaseSpan::default(),
            evacuation: PhaseSpan::default(),
            update_refs: PhaseSpan::default(),
            dirty_cards: 0,
            copied_bytes: AtomicUsize::new(0),
            promoted_regions: AtomicUsize::new(0),
            live_objects: AtomicUsize::new(0),
            remset_size: AtomicUsize::new(0),
            remset_refs: AtomicUsize::new(0),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AnalyticsState {
        self.state
    }

    /// Sample history of a metric
    pub fn sequence(&self, metric: Metric) -> &MetricSequence {
        &self.sequences[metric as usize]
    }

    /// End of the previous collection, in nanoseconds
    pub fn previous_collection_end_ns(&self) -> u64 {
        self.previous_young_collection_end
    }

    /// Counters accumulated by the collection in flight
    pub fn counters(&self) -> CollectionCounters {
        CollectionCounters {
            copied_bytes: self.copied_bytes.load(Ordering::Relaxed),
            promoted_regions: self.promoted_regions.load(Ordering::Relaxed),
            live_objects: self.live_objects.load(Ordering::Relaxed),
            remset_size: self.remset_size.load(Ordering::Relaxed),
            remset_refs: self.remset_refs.load(Ordering::Relaxed),
            dirty_cards: self.dirty_cards,
        }
    }

    // ---------------------------------------------------------------------
    // Reports from the GC driver
    // ---------------------------------------------------------------------

    /// Begin measuring a collection, resetting all counters
    pub fn report_collection_start(&mut self, time_ns: u64) {
        debug_assert_eq!(self.state, AnalyticsState::Idle, "collection already started");
        self.state = AnalyticsState::Collecting;
        self.current_young_collection_start = time_ns;
        self.marking = PhaseSpan::default();
        self.scan_dirty_cards = PhaseSpan::default();
        self.evacuation = PhaseSpan::default();
        self.update_refs = PhaseSpan::default();
        self.dirty_cards = 0;
        self.copied_bytes.store(0, Ordering::Relaxed);
        self.promoted_regions.store(0, Ordering::Relaxed);
        self.live_objects.store(0, Ordering::Relaxed);
        self.remset_size.store(0, Ordering::Relaxed);
        self.remset_refs.store(0, Ordering::Relaxed);
    }

    /// Marking began
    pub fn report_marking_start(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.marking.start = time_ns;
    }

    /// Marking finished
    pub fn report_marking_end(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.marking.end = time_ns;
    }

    /// Dirty card scanning began
    pub fn report_scan_dirty_cards_start(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.scan_dirty_cards.start = time_ns;
    }

    /// Dirty card scanning finished after processing `dirty_cards` cards
    pub fn report_scan_dirty_cards_end(&mut self, time_ns: u64, dirty_cards: usize) {
        self.debug_assert_collecting();
        self.scan_dirty_cards.end = time_ns;
        self.dirty_cards = dirty_cards;
    }

    /// Evacuation began
    pub fn report_evacuation_start(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.evacuation.start = time_ns;
    }

    /// Evacuation finished
    pub fn report_evacuation_end(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.evacuation.end = time_ns;
    }

    /// Reference updating began
    pub fn report_update_refs_start(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.update_refs.start = time_ns;
    }

    /// Reference updating finished
    pub fn report_update_refs_end(&mut self, time_ns: u64) {
        self.debug_assert_collecting();
        self.update_refs.end = time_ns;
    }

    // ---------------------------------------------------------------------
    // Reports from GC workers
    // ---------------------------------------------------------------------

    /// Bytes copied out of a collection-set region
    pub fn report_evacuated_bytes(&self, bytes: usize) {
        self.debug_assert_collecting();
        self.copied_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// One eden region was promoted in place
    pub fn report_promoted_region(&self) {
        self.debug_assert_collecting();
        self.promoted_regions.fetch_add(1, Ordering::Relaxed);
    }

    /// Live objects found while marking or evacuating
    pub fn report_live_objects(&self, count: usize) {
        self.debug_assert_collecting();
        self.live_objects.fetch_add(count, Ordering::Relaxed);
    }

    /// Remembered-set chunks scanned and the references found in them
    pub fn report_remset_size(&self, remset_size: usize, remset_refs: usize) {
        self.debug_assert_collecting();
        self.remset_size.fetch_add(remset_size, Ordering::Relaxed);
        self.remset_refs.fetch_add(remset_refs, Ordering::Relaxed);
    }

    /// Finish measuring a collection and fold its statistics into the history
    ///
    /// Returns the metrics dump when `dump` is set.
    pub fn report_collection_end<R: Region>(
        &mut self,
        cause: GcTaskCause,
        end_time_ns: u64,
        collection_set: &CollectionSet<R>,
        dump: bool,
    ) -> Option<MetricsDump> {
        debug_assert_eq!(self.state, AnalyticsState::Collecting, "collection not started");
        let counters = self.counters();
        let eden_length = collection_set.young().len();
        let app_time_us = (self
            .current_young_collection_start
            .saturating_sub(self.previous_young_collection_end) as f64
            / NANOS_TO_MICROS)
            .max(1.0);
        let allocation_rate = eden_length as f64 / app_time_us;
        let pause_time_us =
            end_time_ns.saturating_sub(self.current_young_collection_start) as f64 / NANOS_TO_MICROS;

        let metrics = dump.then(|| {
            self.dump_metrics(collection_set, &counters, pause_time_us, allocation_rate)
        });
        if let Some(metrics) = &metrics {
            for line in metrics.lines() {
                tracing::info!(
                    target: "otter::gc",
                    metric = line.name,
                    actual = line.actual,
                    prediction = line.predicted,
                    error_percent = line.error_percent(),
                    "G1 analytics metric"
                );
            }
        }

        self.add(Metric::AllocationRate, allocation_rate);

        if cause != GcTaskCause::Explicit
            && eden_length == collection_set.len()
            && eden_length > 0
        {
            self.update_young_statistics(cause, collection_set, &counters, pause_time_us);
        }

        self.previous_young_collection_end = end_time_ns;
        self.state = AnalyticsState::Idle;
        metrics
    }

    fn update_young_statistics<R: Region>(
        &mut self,
        cause: GcTaskCause,
        collection_set: &CollectionSet<R>,
        counters: &CollectionCounters,
        pause_time_us: f64,
    ) {
        let eden_length = collection_set.young().len();
        let predicted_pause_us = self.predict_young_collection_time_for_set(collection_set);
        self.add(
            Metric::PredictionError,
            (pause_time_us - predicted_pause_us as f64).abs(),
        );

        let eden = eden_length as f64;
        self.add(
            Metric::LiveObjectsPerRegion,
            counters.live_objects as f64 / eden,
        );

        let evacuation_time = self.evacuation.duration_us();
        let promoted_regions = counters.promoted_regions.min(eden_length);
        let compacted_regions = eden_length - promoted_regions;
        if compacted_regions > 0 {
            self.add(
                Metric::CopiedBytesPerRegion,
                counters.copied_bytes as f64 / compacted_regions as f64,
            );
            let estimated_promotion_time = self.estimate_promotion_time(promoted_regions);
            if evacuation_time > estimated_promotion_time {
                self.add(
                    Metric::CopyingBytesRate,
                    counters.copied_bytes as f64 / (evacuation_time - estimated_promotion_time),
                );
            }
        }

        let traced = (counters.live_objects + counters.remset_refs) as f64;
        let marking_time = self.marking.duration_us();
        if marking_time > 0.0 {
            self.add(Metric::MarkingRate, traced / marking_time);
        }
        let update_refs_time = self.update_refs.duration_us();
        if update_refs_time > 0.0 {
            self.add(Metric::UpdateRefsRate, traced / update_refs_time);
        }

        self.add(
            Metric::PromotionFraction,
            promoted_regions as f64 / eden,
        );
        self.add(
            Metric::OtherTime,
            (pause_time_us - marking_time - evacuation_time - update_refs_time).max(0.0),
        );

        if counters.dirty_cards > 0 {
            let scan_time = self.scan_dirty_cards.duration_us();
            if scan_time > 0.0 {
                self.add(
                    Metric::ScanDirtyCardsRate,
                    counters.dirty_cards as f64 / scan_time,
                );
            }
        }

        // Threshold-triggered collections follow the previous one too closely
        // for their remembered sets to be representative
        if cause != GcTaskCause::HeapUsageThreshold {
            self.add(Metric::RemsetRefsCount, counters.remset_refs as f64);
            if counters.remset_size > 0 {
                self.add(
                    Metric::RemsetRefsPerChunk,
                    counters.remset_refs as f64 / counters.remset_size as f64,
                );
            }
        }
    }

    // ---------------------------------------------------------------------
    // Predictions
    // ---------------------------------------------------------------------

    /// Predicted eden regions allocated per microsecond
    pub fn predict_allocation_rate(&self) -> f64 {
        self.predict(Metric::AllocationRate)
    }

    /// Predicted pause of a young collection of `eden_length` regions
    pub fn predict_young_collection_time_in_micros(&self, eden_length: usize) -> i64 {
        let remset_refs = self.predict(Metric::RemsetRefsCount);
        to_micros(self.predict_young_time(eden_length, remset_refs))
    }

    /// Predicted pause of a young collection of an already chosen set
    ///
    /// Uses the actual remembered-set sizes of the eden regions instead of
    /// the predicted reference count.
    pub fn predict_young_collection_time_for_set<R: Region>(
        &self,
        collection_set: &CollectionSet<R>,
    ) -> i64 {
        let remset_size: usize = collection_set
            .young()
            .iter()
            .map(|region| region.remset_size())
            .sum();
        let remset_refs = self.predict_remset_refs_count(remset_size);
        to_micros(self.predict_young_time(collection_set.young().len(), remset_refs))
    }

    /// Predicted cost of collecting an old region
    pub fn predict_old_region_collection_time_in_micros<R: Region + ?Sized>(
        &self,
        region: &R,
    ) -> i64 {
        self.predict_old_collection_time_in_micros(
            region.remset_size(),
            region.live_bytes(),
            region.live_objects(),
        )
    }

    /// Predicted cost of collecting old data with the given shape
    pub fn predict_old_collection_time_in_micros(
        &self,
        remset_size: usize,
        live_bytes: usize,
        live_objects: usize,
    ) -> i64 {
        let remset_refs = self.predict_remset_refs_count(remset_size);
        let marking_time = self.predict_time(live_objects as f64 + remset_refs, Metric::MarkingRate);
        let copying_time = self.predict_time(live_bytes as f64, Metric::CopyingBytesRate);
        to_micros(marking_time + copying_time)
    }

    /// Predicted time to scan `dirty_cards` cards
    pub fn predict_scan_dirty_cards_time(&self, dirty_cards: usize) -> i64 {
        if dirty_cards == 0 {
            return 0;
        }
        to_micros(self.predict_time(dirty_cards as f64, Metric::ScanDirtyCardsRate))
    }

    /// Predicted references found in `remset_size` remembered-set chunks
    pub fn predict_remset_refs_count(&self, remset_size: usize) -> f64 {
        remset_size as f64 * self.predict(Metric::RemsetRefsPerChunk)
    }

    /// Predicted number of eden regions promoted in place
    pub fn predict_promoted_regions(&self, eden_length: usize) -> usize {
        let promoted = eden_length as f64 * self.predict(Metric::PromotionFraction);
        (promoted as usize).min(eden_length)
    }

    /// Estimated cost of promoting `promoted_regions` regions
    pub fn estimate_promotion_time_in_micros(&self, promoted_regions: usize) -> i64 {
        to_micros(self.estimate_promotion_time(promoted_regions))
    }

    /// Expected error of young pause predictions
    pub fn estimate_prediction_error_in_micros(&self) -> i64 {
        to_micros(self.predict(Metric::PredictionError))
    }

    /// Compare the measurements of the collection in flight with predictions
    pub fn dump_metrics<R: Region>(
        &self,
        collection_set: &CollectionSet<R>,
        counters: &CollectionCounters,
        pause_time_us: f64,
        allocation_rate: f64,
    ) -> MetricsDump {
        let eden_length = collection_set.young().len();
        let eden = eden_length.max(1) as f64;
        let promoted = counters.promoted_regions.min(eden_length);
        let compacted = (eden_length - promoted).max(1) as f64;
        let traced = (counters.live_objects + counters.remset_refs) as f64;
        let predicted_traced = eden_length as f64 * self.predict(Metric::LiveObjectsPerRegion)
            + self.predict_remset_refs_count(counters.remset_size);

        let mut dump = MetricsDump::default();
        dump.push("allocation_rate", allocation_rate, self.predict_allocation_rate());
        dump.push(
            "live_objects",
            counters.live_objects as f64,
            eden_length as f64 * self.predict(Metric::LiveObjectsPerRegion),
        );
        dump.push(
            "promoted_regions",
            promoted as f64,
            self.predict_promoted_regions(eden_length) as f64,
        );
        dump.push(
            "copied_bytes_per_region",
            counters.copied_bytes as f64 / compacted,
            self.predict(Metric::CopiedBytesPerRegion),
        );
        dump.push(
            "remset_refs",
            counters.remset_refs as f64,
            self.predict_remset_refs_count(counters.remset_size),
        );
        dump.push(
            "marking_time_us",
            self.marking.duration_us(),
            self.predict_time(predicted_traced, Metric::MarkingRate),
        );
        dump.push(
            "copying_time_us",
            self.evacuation.duration_us(),
            self.predict_time(counters.copied_bytes as f64, Metric::CopyingBytesRate)
                + self.estimate_promotion_time(promoted),
        );
        dump.push(
            "update_refs_time_us",
            self.update_refs.duration_us(),
            self.predict_time(traced, Metric::UpdateRefsRate),
        );
        dump.push(
            "scan_dirty_cards_time_us",
            self.scan_dirty_cards.duration_us(),
            self.predict_scan_dirty_cards_time(counters.dirty_cards) as f64,
        );
        dump.push(
            "live_objects_per_region",
            counters.live_objects as f64 / eden,
            self.predict(Metric::LiveObjectsPerRegion),
        );
        dump.push(
            "pause_time_us",
            pause_time_us,
            self.predict_young_collection_time_for_set(collection_set) as f64,
        );
        dump
    }

    fn predict(&self, metric: Metric) -> f64 {
        self.predictor.predict(self.sequence(metric))
    }

    /// `volume / predicted rate`, 0 when there is no usable rate yet
    fn predict_time(&self, volume: f64, rate: Metric) -> f64 {
        if volume <= 0.0 {
            return 0.0;
        }
        let rate = self.predict(rate);
        if rate <= MIN_PREDICTED_RATE {
            return 0.0;
        }
        volume / rate
    }

    fn predict_young_time(&self, eden_length: usize, remset_refs: f64) -> f64 {
        let promoted_regions = self.predict_promoted_regions(eden_length);
        let compacted_regions = (eden_length - promoted_regions) as f64;
        let copied_bytes = compacted_regions * self.predict(Metric::CopiedBytesPerRegion);
        let live_objects = eden_length as f64 * self.predict(Metric::LiveObjectsPerRegion);
        let traced = live_objects + remset_refs;

        self.predict_time(traced, Metric::MarkingRate)
            + self.predict_time(copied_bytes, Metric::CopyingBytesRate)
            + self.predict_time(traced, Metric::UpdateRefsRate)
            + self.estimate_promotion_time(promoted_regions)
            + self.predict(Metric::OtherTime)
    }

    fn estimate_promotion_time(&self, promoted_regions: usize) -> f64 {
        self.promotion_time_per_region_us * promoted_regions as f64
    }

    fn add(&mut self, metric: Metric, value: f64) {
        if value.is_finite() {
            self.sequences[metric as usize].add(value);
        }
    }

    #[inline]
    fn debug_assert_collecting(&self) {
        debug_assert_eq!(
            self.state,
            AnalyticsState::Collecting,
            "collection counters reported outside of a collection"
        );
    }
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("state", &self.state)
            .field("previous_collection_end_ns", &self.previous_young_collection_end)
            .field("counters", &self.counters())
            .field(
                "samples",
                &Metric::ALL
                    .iter()
                    .map(|&metric| (metric.name(), self.sequence(metric).len()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn to_micros(time_us: f64) -> i64 {
    time_us.round() as i64
}

/// One actual-vs-predicted line of a metrics dump
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    /// Metric name
    pub name: &'static str,
    /// Value measured in the last collection
    pub actual: f64,
    /// Value predicted from the history before that collection
    pub predicted: f64,
}

impl MetricLine {
    /// Prediction error relative to the actual value, `None` when actual is 0
    pub fn error_percent(&self) -> Option<f64> {
        if self.actual > 0.0 {
            Some(PERCENTS * (self.predicted - self.actual) / self.actual)
        } else {
            None
        }
    }
}

/// Human-readable comparison of measured and predicted values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsDump {
    lines: Vec<MetricLine>,
}

impl MetricsDump {
    fn push(&mut self, name: &'static str, actual: f64, predicted: f64) {
        self.lines.push(MetricLine {
            name,
            actual,
            predicted,
        });
    }

    /// All lines, in dump order
    pub fn lines(&self) -> &[MetricLine] {
        &self.lines
    }

    /// Line for a metric name
    pub fn get(&self, name: &str) -> Option<&MetricLine> {
        self.lines.iter().find(|line| line.name == name)
    }
}

impl fmt::Display for MetricsDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(
                f,
                "{}: actual {:.3} prediction {:.3}",
                line.name, line.actual, line.predicted
            )?;
            match line.error_percent() {
                Some(error) => writeln!(f, " error {error:.1}%")?,
                None => writeln!(f, " error n/a")?,
            }
        }
        Ok(())
    }
}
