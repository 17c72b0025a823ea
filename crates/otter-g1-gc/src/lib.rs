//! # Otter G1 Pacing
//!
//! Pause-time pacing and collection analytics for a region-based G1
//! collector.
//!
//! ## Design
//!
//! - **Pause tracking**: Sliding window of recent pauses, budget checks and
//!   the delay before the next pause fits
//! - **Analytics**: Per-unit rates sampled after each collection, predicted
//!   as mean plus a fraction of the standard deviation
//! - **Collection sets**: Eden regions plus old regions chosen against the
//!   predicted pause budget
//! - **Driver**: Single-flight admission, safepointed phases on a worker pool,
//!   triggers deferred by the pause-time goal

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod analytics;
pub mod clock;
pub mod collection_set;
pub mod config;
pub mod error;
pub mod gc;
pub mod pause_tracker;
pub mod predictor;
pub mod region;
pub mod safepoint;
pub mod task;
pub mod workers;

pub use analytics::{Analytics, AnalyticsState, CollectionCounters, Metric, MetricLine, MetricsDump};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use collection_set::CollectionSet;
pub use config::{DEFAULT_SEQUENCE_CAPACITY, G1Config};
pub use error::{ConfigError, ConfigResult};
pub use gc::{CollectionSummary, G1Gc, GcPhase, GcStats, RunOutcome, TriggerOutcome};
pub use pause_tracker::{PauseEntry, PauseTracker};
pub use predictor::{MetricSequence, Predictor};
pub use region::{Region, RegionHeap, RegionId};
pub use safepoint::{MutatorHandle, MutatorRendezvous, MutatorStatus, Safepoint, safepoint_poll};
pub use task::{GcCollectionType, GcTask, GcTaskCause};
pub use workers::GcWorkers;
