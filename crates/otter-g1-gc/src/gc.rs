//! G1 collection driver
//!
//! `G1Gc` owns the pacing state of one heap. Mutators hand it GC tasks; it
//! decides whether the pause budget allows a collection now, admits one
//! collection at a time, builds the collection set, drives the phases on the
//! worker pool and feeds the outcome back into analytics, the pause tracker
//! and the eden sizing policy.
//!
//! ## Admission
//!
//! ```text
//! run_gc(task)
//!   counter = gc_counter
//!   CAS phase Idle -> Running, else sleep and retry
//!   skip if another collection with cause >= task.cause finished meanwhile
//!   safepoint_begin, Marking -> ScanDirtyCards -> Evacuation -> UpdateRefs, safepoint_end
//!   gc_counter += 1, phase = Idle
//! ```

use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::analytics::{Analytics, MetricsDump};
use crate::clock::Clock;
use crate::collection_set::CollectionSet;
use crate::config::G1Config;
use crate::error::ConfigResult;
use crate::pause_tracker::PauseTracker;
use crate::region::{Region, RegionHeap};
use crate::safepoint::Safepoint;
use crate::task::{GcCollectionType, GcTask, GcTaskCause};
use crate::workers::GcWorkers;

/// Longest single sleep of `pause_time_goal_delay`
const MAX_PAUSE_GOAL_SLEEP_US: i64 = 1000;

/// Collector phase
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcPhase {
    /// No GC in progress
    Idle = 0,
    /// Admitted, building the collection set
    Running = 1,
    /// Marking live objects of the collection set
    Marking = 2,
    /// Scanning dirty cards into remembered sets
    ScanDirtyCards = 3,
    /// Copying or promoting live objects
    Evacuation = 4,
    /// Fixing references to moved objects
    UpdateRefs = 5,
}

impl From<u8> for GcPhase {
    fn from(v: u8) -> Self {
        match v {
            1 => GcPhase::Running,
            2 => GcPhase::Marking,
            3 => GcPhase::ScanDirtyCards,
            4 => GcPhase::Evacuation,
            5 => GcPhase::UpdateRefs,
            _ => GcPhase::Idle,
        }
    }
}

/// Collector statistics
#[derive(Debug, Default, Clone)]
pub struct GcStats {
    /// Number of collections
    pub collections: u64,
    /// Collections that included old regions
    pub mixed_collections: u64,
    /// Triggers postponed by the pause-time goal
    pub deferred_triggers: u64,
    /// Tasks dropped because a collection ran while they waited
    pub skipped_after_waiting: u64,
    /// Pauses that pushed the window over its budget
    pub budget_exceeded: u64,
    /// Total time in GC pauses (nanoseconds)
    pub total_pause_ns: u64,
    /// Max pause time (nanoseconds)
    pub max_pause_ns: u64,
    /// Last pause time (nanoseconds)
    pub last_pause_ns: u64,
}

impl GcStats {
    /// Mean pause, 0 before the first collection
    pub fn average_pause_ns(&self) -> u64 {
        if self.collections == 0 {
            0
        } else {
            self.total_pause_ns / self.collections
        }
    }
}

/// What one collection did
#[derive(Debug, Clone)]
pub struct CollectionSummary {
    /// Cause of the task that ran
    pub cause: GcTaskCause,
    /// Young or mixed
    pub collection_type: GcCollectionType,
    /// Eden regions collected
    pub young_regions: usize,
    /// Old regions collected
    pub old_regions: usize,
    /// Pause length in nanoseconds
    pub pause_ns: u64,
    /// Whether the pause window stayed within its budget
    pub within_budget: bool,
    /// Predicted vs actual metrics, when dumping is enabled
    pub metrics: Option<MetricsDump>,
}

/// Result of `run_gc`
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// A collection ran
    Collected(CollectionSummary),
    /// An equal or higher priority collection finished while waiting
    AlreadyCollected,
    /// The collection set was empty
    NothingToCollect,
    /// Not enough free regions to evacuate the collection set
    InsufficientSpace,
}

impl RunOutcome {
    /// Summary of the collection, if one ran
    pub fn summary(&self) -> Option<&CollectionSummary> {
        match self {
            RunOutcome::Collected(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Result of `trigger`
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    /// The pause budget does not allow a collection for `delay_us` more microseconds
    Deferred {
        /// Time until the predicted pause fits the window
        delay_us: i64,
    },
    /// The task was handed to `run_gc`
    Ran(RunOutcome),
}

impl TriggerOutcome {
    /// Whether a collection actually ran
    pub fn collected(&self) -> bool {
        matches!(self, TriggerOutcome::Ran(RunOutcome::Collected(_)))
    }
}

/// Pause-time driven G1 collector front end
pub struct G1Gc<H: RegionHeap, C: Clock, S: Safepoint> {
    config: G1Config,
    heap: H,
    clock: C,
    safepoint: S,
    workers: GcWorkers,
    analytics: Mutex<Analytics>,
    pause_tracker: Mutex<PauseTracker>,
    stats: Mutex<GcStats>,
    phase: AtomicU8,
    gc_counter: AtomicU64,
    last_cause: AtomicU8,
    mixed_gc_required: AtomicBool,
    postponed: AtomicBool,
    native_bytes: AtomicUsize,
    target_footprint: AtomicUsize,
}

impl<H: RegionHeap, C: Clock, S: Safepoint> G1Gc<H, C, S> {
    /// Create a collector for `heap`
    pub fn new(config: G1Config, heap: H, clock: C, safepoint: S) -> ConfigResult<Self> {
        config.validate()?;
        let analytics = Analytics::new(clock.now_ns(), &config);
        let pause_tracker = PauseTracker::new(config.pause_interval_ms, config.max_gc_pause_ms);
        let target_footprint = target_footprint_for(&config, heap.heap_size());
        Ok(Self {
            workers: GcWorkers::new(config.gc_workers),
            analytics: Mutex::new(analytics),
            pause_tracker: Mutex::new(pause_tracker),
            stats: Mutex::new(GcStats::default()),
            phase: AtomicU8::new(GcPhase::Idle as u8),
            gc_counter: AtomicU64::new(0),
            last_cause: AtomicU8::new(GcTaskCause::Invalid as u8),
            mixed_gc_required: AtomicBool::new(false),
            postponed: AtomicBool::new(false),
            native_bytes: AtomicUsize::new(0),
            target_footprint: AtomicUsize::new(target_footprint),
            config,
            heap,
            clock,
            safepoint,
        })
    }

    /// Collector configuration
    pub fn config(&self) -> &G1Config {
        &self.config
    }

    /// The managed heap
    pub fn heap(&self) -> &H {
        &self.heap
    }

    /// Time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get current GC phase
    pub fn phase(&self) -> GcPhase {
        GcPhase::from(self.phase.load(Ordering::Acquire))
    }

    /// Get statistics
    pub fn stats(&self) -> GcStats {
        self.stats.lock().clone()
    }

    /// Number of finished collection attempts
    pub fn gc_counter(&self) -> u64 {
        self.gc_counter.load(Ordering::Acquire)
    }

    /// Cause of the last admitted collection
    pub fn last_cause(&self) -> GcTaskCause {
        GcTaskCause::from(self.last_cause.load(Ordering::Acquire))
    }

    /// Collection analytics, locked
    pub fn analytics(&self) -> MutexGuard<'_, Analytics> {
        self.analytics.lock()
    }

    /// Pause history, locked
    pub fn pause_tracker(&self) -> MutexGuard<'_, PauseTracker> {
        self.pause_tracker.lock()
    }

    /// Whether the next collection will include old regions
    pub fn is_mixed_gc_required(&self) -> bool {
        self.mixed_gc_required.load(Ordering::Acquire)
    }

    /// Heap footprint at which the heap-usage trigger fires
    pub fn target_footprint(&self) -> usize {
        self.target_footprint.load(Ordering::Relaxed)
    }

    /// Native bytes currently registered
    pub fn native_bytes(&self) -> usize {
        self.native_bytes.load(Ordering::Relaxed)
    }

    /// Schedule mixed collections once old-generation marking has finished
    ///
    /// Returns `false` if no old region has enough garbage to be worth it.
    pub fn request_mixed_gc(&self) -> bool {
        let worth_it = self.has_garbage_regions();
        if worth_it {
            self.mixed_gc_required.store(true, Ordering::Release);
        }
        worth_it
    }

    /// Enter the postponed mode used while the application starts up
    ///
    /// Every old region with any garbage becomes a mixed collection candidate
    /// until [`postpone_gc_end`](Self::postpone_gc_end). Returns `false` if
    /// the mode was already on.
    pub fn postpone_gc_start(&self) -> bool {
        let started = !self.postponed.swap(true, Ordering::AcqRel);
        if started {
            tracing::debug!(target: "otter::gc", "GC postponed, garbage rate threshold lifted");
        }
        started
    }

    /// Leave the postponed mode, returns `false` if it was not on
    pub fn postpone_gc_end(&self) -> bool {
        let ended = self.postponed.swap(false, Ordering::AcqRel);
        if ended {
            tracing::debug!(
                target: "otter::gc",
                threshold = self.config.region_garbage_rate_threshold,
                "GC postpone ended, garbage rate threshold restored"
            );
        }
        ended
    }

    /// Whether [`postpone_gc_start`](Self::postpone_gc_start) is in effect
    pub fn is_postponed(&self) -> bool {
        self.postponed.load(Ordering::Acquire)
    }

    /// Garbage rate an old region needs to join a mixed collection
    pub fn garbage_rate_threshold(&self) -> f64 {
        if self.is_postponed() {
            0.0
        } else {
            self.config.region_garbage_rate_threshold
        }
    }

    // ---------------------------------------------------------------------
    // Triggers
    // ---------------------------------------------------------------------

    /// Request a collection, unless the pause-time goal asks to wait
    ///
    /// Urgent causes always run.
    pub fn trigger(&self, cause: GcTaskCause) -> TriggerOutcome {
        let task = GcTask::new(cause, self.clock.now_ns());
        if self.config.enable_pause_time_goal && !cause.is_urgent() {
            let delay_us = self.delay_before_predicted_pause();
            if delay_us > 0 {
                self.stats.lock().deferred_triggers += 1;
                tracing::debug!(
                    target: "otter::gc",
                    cause = %cause,
                    delay_us,
                    "GC deferred by pause time goal"
                );
                return TriggerOutcome::Deferred { delay_us };
            }
        }
        TriggerOutcome::Ran(self.run_gc(task))
    }

    /// Account native memory, may trigger a `NativeAlloc` collection
    pub fn register_native_allocation(&self, bytes: usize) -> Option<TriggerOutcome> {
        let previous = self
            .native_bytes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(bytes))
            })
            .unwrap_or_else(|current| current);
        let total = previous.saturating_add(bytes);
        let watermark = self.config.native_gc_watermark?;
        if total > watermark {
            tracing::debug!(
                target: "otter::gc",
                native_bytes = total,
                watermark,
                "Native allocations crossed the GC watermark"
            );
            return Some(self.trigger(GcTaskCause::NativeAlloc));
        }
        None
    }

    /// Release native memory registered earlier
    pub fn register_native_free(&self, bytes: usize) {
        let _ = self
            .native_bytes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(bytes))
            });
    }

    /// Collect if the heap has grown to the target footprint
    pub fn check_heap_usage(&self) -> Option<TriggerOutcome> {
        let heap_size = self.heap.heap_size();
        let target = self.target_footprint();
        if heap_size < target {
            return None;
        }
        tracing::debug!(
            target: "otter::gc",
            heap_size,
            target_footprint = target,
            "Heap usage reached the trigger footprint"
        );
        Some(self.trigger(GcTaskCause::HeapUsageThreshold))
    }

    /// Block until the pause window has room for a max-length pause
    ///
    /// Returns the time waited according to the collector's clock.
    pub fn pause_time_goal_delay(&self) -> Duration {
        if !self.config.enable_pause_time_goal {
            return Duration::ZERO;
        }
        let start_us = self.clock.now_us();
        loop {
            let now_us = self.clock.now_us();
            let remained = self
                .pause_tracker
                .lock()
                .min_delay_before_max_pause_in_micros(now_us);
            if remained <= 0 {
                let waited = (now_us - start_us).max(0) as u64;
                return Duration::from_micros(waited);
            }
            let sleep_us = remained.min(MAX_PAUSE_GOAL_SLEEP_US) as u64;
            std::thread::sleep(Duration::from_micros(sleep_us));
        }
    }

    fn delay_before_predicted_pause(&self) -> i64 {
        // A collection in flight owns the analytics; leave the decision to run_gc
        let Some(analytics) = self.analytics.try_lock() else {
            return 0;
        };
        let eden_length = self.heap.young_regions().len();
        let predicted = analytics.predict_young_collection_time_in_micros(eden_length)
            + analytics.estimate_prediction_error_in_micros();
        drop(analytics);
        self.pause_tracker
            .lock()
            .min_delay_before_pause_in_micros(self.clock.now_us(), predicted)
    }

    // ---------------------------------------------------------------------
    // Collection
    // ---------------------------------------------------------------------

    /// Run a collection for `task`, waiting for a running one to finish first
    pub fn run_gc(&self, mut task: GcTask) -> RunOutcome {
        let old_counter = self.gc_counter.load(Ordering::Acquire);
        self.wait_for_idle_gc();
        if !self.need_run_gc_after_waiting(old_counter, &task) {
            self.set_phase(GcPhase::Idle);
            self.stats.lock().skipped_after_waiting += 1;
            tracing::debug!(
                target: "otter::gc",
                cause = %task.cause,
                "GC already done by another thread"
            );
            return RunOutcome::AlreadyCollected;
        }
        self.last_cause.store(task.cause as u8, Ordering::Release);

        self.safepoint.safepoint_begin();
        let outcome = self.run_phases(&mut task);
        self.safepoint.safepoint_end();

        self.gc_counter.fetch_add(1, Ordering::Release);
        self.set_phase(GcPhase::Idle);
        outcome
    }

    /// Whether `task` still needs a collection after waiting for admission
    ///
    /// A task is satisfied by any collection that finished while it waited,
    /// unless that collection ran for a lower-priority cause.
    pub fn need_run_gc_after_waiting(&self, counter_before_waiting: u64, task: &GcTask) -> bool {
        let new_counter = self.gc_counter.load(Ordering::Acquire);
        debug_assert!(new_counter >= counter_before_waiting);
        new_counter == counter_before_waiting || self.last_cause() < task.cause
    }

    fn wait_for_idle_gc(&self) {
        while self
            .phase
            .compare_exchange(
                GcPhase::Idle as u8,
                GcPhase::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            std::thread::sleep(Duration::from_micros(self.config.wait_for_idle_sleep_us));
        }
    }

    fn set_phase(&self, phase: GcPhase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    fn run_phases(&self, task: &mut GcTask) -> RunOutcome {
        tracing::debug!(target: "otter::gc", cause = %task.cause, "G1 GC start");
        let is_mixed = self.is_mixed_gc_required();
        task.collection_type = if is_mixed {
            GcCollectionType::Mixed
        } else {
            GcCollectionType::Young
        };

        let collection_set = self.collection_set(is_mixed);
        if collection_set.is_empty() {
            tracing::debug!(target: "otter::gc", "Failed to run gc: nothing to collect");
            return RunOutcome::NothingToCollect;
        }
        let free_regions = self.heap.free_regions();
        if free_regions < collection_set.len() {
            tracing::debug!(
                target: "otter::gc",
                free_regions,
                collection_set = collection_set.len(),
                "Failed to run gc: not enough free regions to move"
            );
            return RunOutcome::InsufficientSpace;
        }

        let mut analytics = self.analytics.lock();
        let start_ns = self.clock.now_ns();
        analytics.report_collection_start(start_ns);
        self.run_phases_for_regions(&mut analytics, &collection_set);
        let end_ns = self.clock.now_ns();

        let within_budget = self
            .pause_tracker
            .lock()
            .add_pause_in_nanos(start_ns as i64, end_ns as i64);
        if !within_budget {
            tracing::warn!(
                target: "otter::gc",
                pause_us = end_ns.saturating_sub(start_ns) / 1000,
                max_gc_pause_ms = self.config.max_gc_pause_ms,
                pause_interval_ms = self.config.pause_interval_ms,
                "GC pause exceeded the pause time budget"
            );
        }
        let metrics = analytics.report_collection_end(
            task.cause,
            end_ns,
            &collection_set,
            self.config.dump_metrics,
        );
        drop(analytics);

        if is_mixed && !self.has_garbage_regions() {
            self.mixed_gc_required.store(false, Ordering::Release);
        }
        self.compute_new_size();
        self.target_footprint.store(
            target_footprint_for(&self.config, self.heap.heap_size()),
            Ordering::Relaxed,
        );

        let pause_ns = end_ns.saturating_sub(start_ns);
        {
            let mut stats = self.stats.lock();
            stats.collections += 1;
            if is_mixed {
                stats.mixed_collections += 1;
            }
            if !within_budget {
                stats.budget_exceeded += 1;
            }
            stats.total_pause_ns += pause_ns;
            stats.max_pause_ns = stats.max_pause_ns.max(pause_ns);
            stats.last_pause_ns = pause_ns;
        }

        tracing::info!(
            target: "otter::gc",
            cause = %task.cause,
            mixed = is_mixed,
            young_regions = collection_set.young().len(),
            old_regions = collection_set.old().len(),
            pause_us = pause_ns / 1000,
            "G1 GC complete"
        );

        RunOutcome::Collected(CollectionSummary {
            cause: task.cause,
            collection_type: task.collection_type,
            young_regions: collection_set.young().len(),
            old_regions: collection_set.old().len(),
            pause_ns,
            within_budget,
            metrics,
        })
    }

    fn collection_set(&self, is_mixed: bool) -> CollectionSet<H::Region> {
        let mut collection_set = CollectionSet::new(self.heap.young_regions());
        if !is_mixed {
            return collection_set;
        }
        let candidates = self.heap.garbage_regions();
        let threshold = self.garbage_rate_threshold();
        let added = if self.config.enable_pause_time_goal {
            let analytics = self.analytics.lock();
            collection_set.add_old_regions_by_pause_goal(
                candidates,
                &analytics,
                self.config.max_gc_pause_us(),
                threshold,
            )
        } else {
            collection_set.add_old_regions_max_allowed(
                candidates,
                self.config.mixed_max_old_regions,
                threshold,
            )
        };
        tracing::debug!(
            target: "otter::gc",
            young = collection_set.young().len(),
            old = added,
            "Collection set built"
        );
        collection_set
    }

    fn run_phases_for_regions(
        &self,
        analytics: &mut Analytics,
        collection_set: &CollectionSet<H::Region>,
    ) {
        let regions = collection_set.to_vec();

        self.set_phase(GcPhase::Marking);
        analytics.report_marking_start(self.clock.now_ns());
        {
            let shared: &Analytics = analytics;
            self.workers
                .run(&regions, |region| self.heap.mark_region(region, shared));
        }
        analytics.report_marking_end(self.clock.now_ns());

        self.set_phase(GcPhase::ScanDirtyCards);
        let dirty_cards = self.heap.dirty_cards();
        analytics.report_scan_dirty_cards_start(self.clock.now_ns());
        self.heap.scan_dirty_cards(analytics);
        analytics.report_scan_dirty_cards_end(self.clock.now_ns(), dirty_cards);

        self.set_phase(GcPhase::Evacuation);
        analytics.report_evacuation_start(self.clock.now_ns());
        {
            let shared: &Analytics = analytics;
            self.workers
                .run(&regions, |region| self.heap.evacuate_region(region, shared));
        }
        analytics.report_evacuation_end(self.clock.now_ns());

        self.set_phase(GcPhase::UpdateRefs);
        analytics.report_update_refs_start(self.clock.now_ns());
        {
            let shared: &Analytics = analytics;
            self.workers
                .run(&regions, |region| self.heap.update_refs(region, shared));
        }
        analytics.report_update_refs_end(self.clock.now_ns());
    }

    fn has_garbage_regions(&self) -> bool {
        self.heap
            .garbage_regions()
            .first()
            .is_some_and(|region| region.garbage_rate() >= self.garbage_rate_threshold())
    }

    // ---------------------------------------------------------------------
    // Eden sizing
    // ---------------------------------------------------------------------

    fn compute_new_size(&self) {
        if !self.config.enable_pause_time_goal {
            return;
        }
        let by_delay = self.desired_eden_length_by_pause_delay();
        let by_duration = self.desired_eden_length_by_pause_duration();
        let desired = by_delay.max(by_duration);
        tracing::debug!(
            target: "otter::gc",
            by_delay,
            by_duration,
            desired,
            "Desired eden length"
        );
        self.heap.set_desired_eden_length(desired);
    }

    /// Eden regions the mutator is expected to fill before the next max pause fits
    pub fn desired_eden_length_by_pause_delay(&self) -> usize {
        let delay_us = self
            .pause_tracker
            .lock()
            .min_delay_before_max_pause_in_micros(self.clock.now_us());
        let allocation_rate = self.analytics.lock().predict_allocation_rate();
        (allocation_rate * delay_us as f64).ceil() as usize
    }

    /// Largest eden whose predicted collection fits the max pause
    pub fn desired_eden_length_by_pause_duration(&self) -> usize {
        if self.mixed_gc_required.load(Ordering::Relaxed) {
            // Collect old regions as often as possible
            return 1;
        }

        let analytics = self.analytics.lock();
        let prediction_error = analytics.estimate_prediction_error_in_micros();
        let max_pause = self.config.max_gc_pause_us();
        let free_regions = self.heap.free_regions();
        let fits = |eden_length: usize| {
            free_regions >= eden_length
                && prediction_error
                    + analytics.predict_young_collection_time_in_micros(eden_length)
                    <= max_pause
        };

        let mut min_length = 1;
        let mut max_length = self.heap.max_young_regions().max(min_length);
        if !fits(min_length) {
            return min_length;
        }
        if fits(max_length) {
            return max_length;
        }
        let mut delta = (max_length - min_length) / 2;
        while delta > 0 {
            let eden_length = min_length + delta;
            if fits(eden_length) {
                min_length = eden_length;
            } else {
                max_length = eden_length;
            }
            debug_assert!(min_length < max_length);
            delta = (max_length - min_length) / 2;
        }
        min_length
    }
}

fn target_footprint_for(config: &G1Config, heap_size: usize) -> usize {
    let extra = (heap_size / 100)
        .saturating_mul(config.heap_trigger_percent as usize)
        .clamp(config.min_extra_heap_size, config.max_extra_heap_size);
    heap_size.saturating_add(extra)
}
