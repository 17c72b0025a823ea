//! GC requests

use std::fmt;

/// Why a collection was requested
///
/// Variants are ordered by priority: a collection run for a cause satisfies
/// pending requests of any lower cause.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GcTaskCause {
    /// No collection has run yet
    Invalid = 0,
    /// Application finished starting up
    StartupComplete = 1,
    /// Native allocations crossed the watermark
    NativeAlloc = 2,
    /// Heap grew past the trigger footprint
    HeapUsageThreshold = 3,
    /// Eden is full
    Young = 4,
    /// Requested by the embedder
    Explicit = 5,
    /// Allocation failed
    Oom = 6,
}

impl GcTaskCause {
    /// Urgent requests are never deferred by the pause-time goal
    pub fn is_urgent(self) -> bool {
        self == GcTaskCause::Oom
    }
}

impl From<u8> for GcTaskCause {
    fn from(v: u8) -> Self {
        match v {
            1 => GcTaskCause::StartupComplete,
            2 => GcTaskCause::NativeAlloc,
            3 => GcTaskCause::HeapUsageThreshold,
            4 => GcTaskCause::Young,
            5 => GcTaskCause::Explicit,
            6 => GcTaskCause::Oom,
            _ => GcTaskCause::Invalid,
        }
    }
}

impl fmt::Display for GcTaskCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GcTaskCause::Invalid => "invalid",
            GcTaskCause::StartupComplete => "startup-complete",
            GcTaskCause::NativeAlloc => "native-alloc",
            GcTaskCause::HeapUsageThreshold => "heap-usage-threshold",
            GcTaskCause::Young => "young",
            GcTaskCause::Explicit => "explicit",
            GcTaskCause::Oom => "oom",
        };
        f.write_str(name)
    }
}

/// Kind of collection that ran for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcCollectionType {
    /// Not run yet
    None,
    /// Eden regions only
    Young,
    /// Eden plus selected old regions
    Mixed,
}

/// A request to collect
#[derive(Debug, Clone)]
pub struct GcTask {
    /// Why the collection was requested
    pub cause: GcTaskCause,
    /// Time the request was made, in nanoseconds
    pub target_time_ns: u64,
    /// Filled in by the collector
    pub collection_type: GcCollectionType,
}

impl GcTask {
    /// Create a task for `cause` requested at `target_time_ns`
    pub fn new(cause: GcTaskCause, target_time_ns: u64) -> Self {
        Self {
            cause,
            target_time_ns,
            collection_type: GcCollectionType::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_priority() {
        assert!(GcTaskCause::Oom > GcTaskCause::Explicit);
        assert!(GcTaskCause::Explicit > GcTaskCause::Young);
        assert!(GcTaskCause::Young > GcTaskCause::HeapUsageThreshold);
        assert!(GcTaskCause::HeapUsageThreshold > GcTaskCause::NativeAlloc);
        assert!(GcTaskCause::Invalid < GcTaskCause::StartupComplete);
    }

    #[test]
    fn test_cause_round_trips_through_u8() {
        for cause in [
            GcTaskCause::Invalid,
            GcTaskCause::StartupComplete,
            GcTaskCause::NativeAlloc,
            GcTaskCause::HeapUsageThreshold,
            GcTaskCause::Young,
            GcTaskCause::Explicit,
            GcTaskCause::Oom,
        ] {
            assert_eq!(GcTaskCause::from(cause as u8), cause);
        }
        assert_eq!(GcTaskCause::from(200), GcTaskCause::Invalid);
    }

    #[test]
    fn test_only_oom_is_urgent() {
        assert!(GcTaskCause::Oom.is_urgent());
        assert!(!GcTaskCause::Explicit.is_urgent());
        assert!(!GcTaskCause::Young.is_urgent());
    }

    #[test]
    fn test_new_task() {
        let task = GcTask::new(GcTaskCause::Young, 42);
        assert_eq!(task.collection_type, GcCollectionType::None);
        assert_eq!(task.cause.to_string(), "young");
    }
}
