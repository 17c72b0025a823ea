//! Error types for otter-g1-gc

use thiserror::Error;

/// Errors reported when a collector configuration is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Pause interval must be a positive number of milliseconds
    #[error("GC pause interval must be positive, got {0}ms")]
    NonPositiveInterval(i64),

    /// Max GC pause must be a positive number of milliseconds
    #[error("max GC pause must be positive, got {0}ms")]
    NonPositivePause(i64),

    /// The pause budget cannot be larger than the window it is measured in
    #[error("max GC pause {pause_ms}ms exceeds pause interval {interval_ms}ms")]
    PauseExceedsInterval {
        /// Configured max pause
        pause_ms: i64,
        /// Configured interval
        interval_ms: i64,
    },

    /// Metric sequences need room for at least one sample
    #[error("metric sequence capacity must be at least 1")]
    ZeroSequenceCapacity,

    /// Waiting for a running collection must sleep between checks
    #[error("wait-for-idle sleep must be at least 1us")]
    ZeroIdleSleep,

    /// A floating point setting was NaN, infinite or negative
    #[error("invalid value for {name}: {value}")]
    InvalidFactor {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Garbage rate threshold must be a fraction
    #[error("region garbage rate threshold must be within [0, 1], got {0}")]
    GarbageRateOutOfRange(f64),

    /// Heap trigger bounds are inverted
    #[error("heap trigger min extra size {min} exceeds max extra size {max}")]
    InvertedExtraHeapSize {
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
}

/// Result alias for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;
