//! Collector configuration

use crate::error::{ConfigError, ConfigResult};

/// Default number of samples kept per metric sequence
pub const DEFAULT_SEQUENCE_CAPACITY: usize = 10;

/// G1 pacing configuration
#[derive(Debug, Clone)]
pub struct G1Config {
    /// Length of the sliding window pauses are accounted in (default: 1000ms)
    pub pause_interval_ms: i64,
    /// Max cumulative pause inside one window (default: 100ms)
    pub max_gc_pause_ms: i64,
    /// Defer collections and size eden to honor the pause budget (default: true)
    pub enable_pause_time_goal: bool,
    /// Fixed bookkeeping cost of promoting one whole region (default: 50us)
    pub promotion_time_per_region_us: f64,
    /// Number of standard deviations added on top of the mean (default: 0.5)
    pub predictor_confidence_factor: f64,
    /// Samples retained per metric (default: 10)
    pub sequence_capacity: usize,
    /// Min garbage fraction for an old region to join a mixed collection (default: 0.8)
    pub region_garbage_rate_threshold: f64,
    /// Old regions per mixed collection when no pause goal is set (default: 2)
    pub mixed_max_old_regions: usize,
    /// Parallel GC workers, 1 disables parallelism (default: min(cpus, 4))
    pub gc_workers: usize,
    /// Sleep between admission retries while another GC runs (default: 100us)
    pub wait_for_idle_sleep_us: u64,
    /// Log predicted vs actual metrics after every collection (default: false)
    pub dump_metrics: bool,
    /// Registered native bytes that schedule a collection (default: none)
    pub native_gc_watermark: Option<usize>,
    /// Heap growth since the last GC that triggers the next one, in percent (default: 20)
    pub heap_trigger_percent: u32,
    /// Lower bound on heap growth between collections (default: 1MB)
    pub min_extra_heap_size: usize,
    /// Upper bound on heap growth between collections (default: 32MB)
    pub max_extra_heap_size: usize,
}

impl Default for G1Config {
    fn default() -> Self {
        Self {
            pause_interval_ms: 1000,
            max_gc_pause_ms: 100,
            enable_pause_time_goal: true,
            promotion_time_per_region_us: 50.0,
            predictor_confidence_factor: 0.5,
            sequence_capacity: DEFAULT_SEQUENCE_CAPACITY,
            region_garbage_rate_threshold: 0.8,
            mixed_max_old_regions: 2,
            gc_workers: std::thread::available_parallelism()
                .map(|n| n.get().min(4))
                .unwrap_or(1),
            wait_for_idle_sleep_us: 100,
            dump_metrics: false,
            native_gc_watermark: None,
            heap_trigger_percent: 20,
            min_extra_heap_size: 1024 * 1024,       // 1MB
            max_extra_heap_size: 32 * 1024 * 1024, // 32MB
        }
    }
}

impl G1Config {
    /// Max pause budget in microseconds
    pub fn max_gc_pause_us(&self) -> i64 {
        self.max_gc_pause_ms * 1000
    }

    /// Check that the settings describe a usable collector
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pause_interval_ms <= 0 {
            return Err(ConfigError::NonPositiveInterval(self.pause_interval_ms));
        }
        if self.max_gc_pause_ms <= 0 {
            return Err(ConfigError::NonPositivePause(self.max_gc_pause_ms));
        }
        if self.max_gc_pause_ms > self.pause_interval_ms {
            return Err(ConfigError::PauseExceedsInterval {
                pause_ms: self.max_gc_pause_ms,
                interval_ms: self.pause_interval_ms,
            });
        }
        if self.sequence_capacity == 0 {
            return Err(ConfigError::ZeroSequenceCapacity);
        }
        if self.wait_for_idle_sleep_us == 0 {
            return Err(ConfigError::ZeroIdleSleep);
        }
        check_factor("promotion_time_per_region_us", self.promotion_time_per_region_us)?;
        check_factor("predictor_confidence_factor", self.predictor_confidence_factor)?;
        if !(0.0..=1.0).contains(&self.region_garbage_rate_threshold) {
            return Err(ConfigError::GarbageRateOutOfRange(
                self.region_garbage_rate_threshold,
            ));
        }
        if self.min_extra_heap_size > self.max_extra_heap_size {
            return Err(ConfigError::InvertedExtraHeapSize {
                min: self.min_extra_heap_size,
                max: self.max_extra_heap_size,
            });
        }
        Ok(())
    }
}

fn check_factor(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactor { name, value })
    }
}
