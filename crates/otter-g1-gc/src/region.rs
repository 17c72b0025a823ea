//! Heap collaborator interfaces
//!
//! The pacing core never touches objects. It sees the heap through [`Region`]
//! handles and delegates the actual phase work to a [`RegionHeap`].

use std::sync::Arc;

use crate::analytics::Analytics;

/// Stable identifier of a heap region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

/// Read-only view of a heap region
pub trait Region: Send + Sync {
    /// Region identifier
    fn id(&self) -> RegionId;
    /// Whether the region holds the newest allocations
    fn is_eden(&self) -> bool;
    /// Number of remembered-set chunks pointing into the region
    fn remset_size(&self) -> usize;
    /// Bytes found live by the last marking
    fn live_bytes(&self) -> usize;
    /// Objects found live by the last marking
    fn live_objects(&self) -> usize;
    /// Bytes allocated in the region
    fn allocated_bytes(&self) -> usize;
    /// Objects allocated in the region
    fn allocated_objects(&self) -> usize;

    /// Bytes that would be reclaimed by collecting the region
    fn garbage_bytes(&self) -> usize {
        self.allocated_bytes().saturating_sub(self.live_bytes())
    }

    /// Garbage as a fraction of allocated bytes
    fn garbage_rate(&self) -> f64 {
        let allocated = self.allocated_bytes();
        if allocated == 0 {
            return 0.0;
        }
        self.garbage_bytes() as f64 / allocated as f64
    }
}

macro_rules! forward_region {
    ($($ty:ty),*) => {
        $(
            impl<R: Region + ?Sized> Region for $ty {
                fn id(&self) -> RegionId { (**self).id() }
                fn is_eden(&self) -> bool { (**self).is_eden() }
                fn remset_size(&self) -> usize { (**self).remset_size() }
                fn live_bytes(&self) -> usize { (**self).live_bytes() }
                fn live_objects(&self) -> usize { (**self).live_objects() }
                fn allocated_bytes(&self) -> usize { (**self).allocated_bytes() }
                fn allocated_objects(&self) -> usize { (**self).allocated_objects() }
            }
        )*
    };
}

forward_region!(&R, Arc<R>);

/// Region allocator and object-graph plumbing driven by the collector
///
/// Phase callbacks run on GC worker threads and report what they did through
/// the `Analytics` counters (`report_live_objects`, `report_evacuated_bytes`,
/// `report_promoted_region`, `report_remset_size`).
pub trait RegionHeap: Sync {
    /// Region handle type
    type Region: Region + Clone;

    /// Size of one region in bytes
    fn region_size(&self) -> usize;
    /// Current eden regions
    fn young_regions(&self) -> Vec<Self::Region>;
    /// Old regions ordered by garbage bytes, most garbage first
    fn garbage_regions(&self) -> Vec<Self::Region>;
    /// Upper bound for the eden length
    fn max_young_regions(&self) -> usize;
    /// Regions available as evacuation targets
    fn free_regions(&self) -> usize;
    /// Bytes currently occupied by the heap
    fn heap_size(&self) -> usize;
    /// Dirty cards waiting to be scanned
    fn dirty_cards(&self) -> usize;

    /// Mark live objects of a collection-set region
    fn mark_region(&self, region: &Self::Region, analytics: &Analytics);
    /// Scan dirty cards into remembered sets
    fn scan_dirty_cards(&self, analytics: &Analytics);
    /// Copy or promote the live objects of a region
    fn evacuate_region(&self, region: &Self::Region, analytics: &Analytics);
    /// Fix references to objects moved out of a region
    fn update_refs(&self, region: &Self::Region, analytics: &Analytics);
    /// Apply the eden length computed from the pause-time goal
    fn set_desired_eden_length(&self, eden_length: usize);
}

impl<H: RegionHeap + Send + ?Sized> RegionHeap for Arc<H> {
    type Region = H::Region;

    fn region_size(&self) -> usize {
        (**self).region_size()
    }
    fn young_regions(&self) -> Vec<Self::Region> {
        (**self).young_regions()
    }
    fn garbage_regions(&self) -> Vec<Self::Region> {
        (**self).garbage_regions()
    }
    fn max_young_regions(&self) -> usize {
        (**self).max_young_regions()
    }
    fn free_regions(&self) -> usize {
        (**self).free_regions()
    }
    fn heap_size(&self) -> usize {
        (**self).heap_size()
    }
    fn dirty_cards(&self) -> usize {
        (**self).dirty_cards()
    }
    fn mark_region(&self, region: &Self::Region, analytics: &Analytics) {
        (**self).mark_region(region, analytics)
    }
    fn scan_dirty_cards(&self, analytics: &Analytics) {
        (**self).scan_dirty_cards(analytics)
    }
    fn evacuate_region(&self, region: &Self::Region, analytics: &Analytics) {
        (**self).evacuate_region(region, analytics)
    }
    fn update_refs(&self, region: &Self::Region, analytics: &Analytics) {
        (**self).update_refs(region, analytics)
    }
    fn set_desired_eden_length(&self, eden_length: usize) {
        (**self).set_desired_eden_length(eden_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        allocated: usize,
        live: usize,
    }

    impl Region for Fixed {
        fn id(&self) -> RegionId {
            RegionId(7)
        }
        fn is_eden(&self) -> bool {
            false
        }
        fn remset_size(&self) -> usize {
            0
        }
        fn live_bytes(&self) -> usize {
            self.live
        }
        fn live_objects(&self) -> usize {
            0
        }
        fn allocated_bytes(&self) -> usize {
            self.allocated
        }
        fn allocated_objects(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_garbage_rate() {
        let region = Fixed {
            allocated: 1000,
            live: 250,
        };
        assert_eq!(region.garbage_bytes(), 750);
        assert!((region.garbage_rate() - 0.75).abs() < 1e-12);

        let shared = Arc::new(region);
        assert_eq!(shared.id(), RegionId(7));
        assert_eq!(shared.garbage_bytes(), 750);
    }

    #[test]
    fn test_empty_region_has_no_garbage() {
        let region = Fixed {
            allocated: 0,
            live: 0,
        };
        assert_eq!(region.garbage_rate(), 0.0);
    }
}
