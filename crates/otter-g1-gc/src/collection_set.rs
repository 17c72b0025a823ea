//! Collection set construction
//!
//! A collection set always holds every eden region. Mixed collections add old
//! regions, picked in garbage order either against the predicted pause budget
//! or up to a fixed count.

use rustc_hash::FxHashSet;

use crate::analytics::Analytics;
use crate::region::{Region, RegionId};

/// Regions taking part in one collection
#[derive(Debug, Clone)]
pub struct CollectionSet<R> {
    young: Vec<R>,
    old: Vec<R>,
    members: FxHashSet<RegionId>,
}

impl<R: Region> CollectionSet<R> {
    /// Create a collection set from the eden regions
    pub fn new(young: impl IntoIterator<Item = R>) -> Self {
        let mut set = Self {
            young: Vec::new(),
            old: Vec::new(),
            members: FxHashSet::default(),
        };
        for region in young {
            set.add_region(region);
        }
        set
    }

    /// Add a region, returns `false` if it is already a member
    pub fn add_region(&mut self, region: R) -> bool {
        if !self.members.insert(region.id()) {
            return false;
        }
        if region.is_eden() {
            self.young.push(region);
        } else {
            self.old.push(region);
        }
        true
    }

    /// Eden regions
    pub fn young(&self) -> &[R] {
        &self.young
    }

    /// Old regions picked for a mixed collection
    pub fn old(&self) -> &[R] {
        &self.old
    }

    /// Total number of regions
    pub fn len(&self) -> usize {
        self.young.len() + self.old.len()
    }

    /// Whether the set has no regions
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the set holds only eden regions
    pub fn is_young_only(&self) -> bool {
        self.old.is_empty()
    }

    /// Whether the region is a member
    pub fn contains(&self, id: RegionId) -> bool {
        self.members.contains(&id)
    }

    /// All regions, eden first
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.young.iter().chain(self.old.iter())
    }

    /// All regions as one vector, eden first
    pub fn to_vec(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Add old regions while their predicted cost fits the pause budget
    ///
    /// `candidates` must be ordered by garbage, most first. The first candidate
    /// is always taken so that every mixed collection makes progress. Returns
    /// the number of old regions added.
    pub fn add_old_regions_by_pause_goal(
        &mut self,
        candidates: impl IntoIterator<Item = R>,
        analytics: &Analytics,
        max_gc_pause_us: i64,
        garbage_rate_threshold: f64,
    ) -> usize {
        let mut candidates = candidates.into_iter();
        let Some(top) = candidates.next() else {
            return 0;
        };
        let mut budget = max_gc_pause_us;
        let top_time = analytics.predict_old_region_collection_time_in_micros(&top);
        let mut added = usize::from(self.add_region(top));
        if budget < top_time {
            tracing::debug!(target: "otter::gc", "Not enough budget to add more than one old region");
            return added;
        }
        budget -= top_time;

        let prediction_error = analytics.estimate_prediction_error_in_micros();
        if budget < prediction_error {
            tracing::debug!(target: "otter::gc", "Not enough budget to add old regions");
            return added;
        }
        budget -= prediction_error;

        let young_time = analytics.predict_young_collection_time_in_micros(self.young.len());
        if budget < young_time {
            tracing::debug!(target: "otter::gc", "Not enough budget to add old regions");
            return added;
        }
        budget -= young_time;

        for region in candidates {
            debug_assert!(!region.is_eden());
            let garbage_rate = region.garbage_rate();
            if garbage_rate < garbage_rate_threshold {
                tracing::debug!(
                    target: "otter::gc",
                    region = region.id().0,
                    garbage_rate,
                    "Garbage rate below threshold, stop adding old regions"
                );
                break;
            }
            let expected = analytics.predict_old_region_collection_time_in_micros(&region);
            if budget < expected {
                tracing::debug!(target: "otter::gc", "Not enough budget to add old regions anymore");
                break;
            }
            budget -= expected;
            tracing::debug!(
                target: "otter::gc",
                region = region.id().0,
                garbage_rate,
                expected_us = expected,
                "Add old region to collection set"
            );
            if self.add_region(region) {
                added += 1;
            }
        }
        added
    }

    /// Add up to `max_regions` old regions whose garbage rate reaches the threshold
    ///
    /// `candidates` must be ordered by garbage, most first. Returns the number
    /// of old regions added.
    pub fn add_old_regions_max_allowed(
        &mut self,
        candidates: impl IntoIterator<Item = R>,
        max_regions: usize,
        garbage_rate_threshold: f64,
    ) -> usize {
        let mut added = 0;
        for region in candidates {
            if added >= max_regions {
                break;
            }
            let garbage_rate = region.garbage_rate();
            if garbage_rate < garbage_rate_threshold {
                tracing::debug!(
                    target: "otter::gc",
                    region = region.id().0,
                    garbage_rate,
                    "Garbage rate below threshold, don't add to collection set"
                );
                break;
            }
            if self.add_region(region) {
                added += 1;
            }
        }
        added
    }
}
