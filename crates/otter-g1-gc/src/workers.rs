//! GC worker pool
//!
//! Each phase hands the pool a slice of work items. Workers pull the next
//! index from a shared cursor until the slice is drained, and the phase ends
//! when every worker has joined.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Fixed-width pool of scoped GC threads
#[derive(Debug, Clone, Copy)]
pub struct GcWorkers {
    count: usize,
}

impl GcWorkers {
    /// Create a pool running up to `count` threads per phase
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
        }
    }

    /// Number of worker threads
    pub fn count(&self) -> usize {
        self.count
    }

    /// Apply `f` to every item, returns after all items are processed
    pub fn run<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync,
    {
        let threads = self.count.min(items.len());
        if threads <= 1 {
            items.iter().for_each(f);
            return;
        }

        let cursor = CachePadded::new(AtomicUsize::new(0));
        thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    loop {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(index) else {
                            break;
                        };
                        f(item);
                    }
                });
            }
        });
    }
}

impl Default for GcWorkers {
    fn default() -> Self {
        Self::new(1)
    }
}
