//! Stop-the-world coordination
//!
//! The collector only needs two calls from the thread manager: stop every
//! mutator and let them run again. [`MutatorRendezvous`] implements them with
//! a request/acknowledge handshake that mutators answer from
//! [`safepoint_poll`].

use parking_lot::{Condvar, Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Thread-suspension collaborator
pub trait Safepoint: Send + Sync {
    /// Suspend all mutators, returns once they are stopped
    fn safepoint_begin(&self);
    /// Resume the mutators suspended by `safepoint_begin`
    fn safepoint_end(&self);
}

impl<S: Safepoint + ?Sized> Safepoint for Arc<S> {
    fn safepoint_begin(&self) {
        (**self).safepoint_begin()
    }

    fn safepoint_end(&self) {
        (**self).safepoint_end()
    }
}

/// Where a mutator is in the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutatorStatus {
    /// Executing freely
    Running,
    /// Asked to stop at its next poll
    Requested,
    /// Parked until the collector resumes it
    Stopped,
}

/// Count of mutators parked in the current round
#[derive(Default)]
struct Arrivals {
    stopped: Mutex<usize>,
    changed: Condvar,
}

impl Arrivals {
    fn arrive(&self) {
        *self.stopped.lock() += 1;
        self.changed.notify_all();
    }
}

/// Per-thread end of the handshake, polled by mutator code
pub struct MutatorHandle {
    id: usize,
    pending: AtomicBool,
    status: Mutex<MutatorStatus>,
    resumed: Condvar,
    arrivals: Arc<Arrivals>,
}

impl MutatorHandle {
    fn new(id: usize, arrivals: Arc<Arrivals>) -> Self {
        Self {
            id,
            pending: AtomicBool::new(false),
            status: Mutex::new(MutatorStatus::Running),
            resumed: Condvar::new(),
            arrivals,
        }
    }

    /// Identifier assigned at registration
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current handshake status
    pub fn status(&self) -> MutatorStatus {
        *self.status.lock()
    }

    /// Park here if the collector asked for a safepoint
    pub fn poll(&self) {
        if !self.pending.load(Ordering::Acquire) {
            return;
        }
        let mut status = self.status.lock();
        if *status != MutatorStatus::Requested {
            return;
        }
        *status = MutatorStatus::Stopped;
        self.arrivals.arrive();
        while *status == MutatorStatus::Stopped {
            self.resumed.wait(&mut status);
        }
    }

    fn request(&self) {
        *self.status.lock() = MutatorStatus::Requested;
        self.pending.store(true, Ordering::Release);
    }

    fn release(&self) {
        let mut status = self.status.lock();
        *status = MutatorStatus::Running;
        self.pending.store(false, Ordering::Release);
        self.resumed.notify_one();
    }
}

/// Handshake-based [`Safepoint`] over registered mutator threads
pub struct MutatorRendezvous {
    mutators: RwLock<Vec<Arc<MutatorHandle>>>,
    arrivals: Arc<Arrivals>,
    next_id: AtomicUsize,
    handshake_timeout: Duration,
}

impl MutatorRendezvous {
    /// Default time to wait for mutators to acknowledge a request
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(100);

    /// Create a rendezvous with the default handshake timeout
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_HANDSHAKE_TIMEOUT)
    }

    /// Create a rendezvous that stops waiting for mutators after `handshake_timeout`
    pub fn with_timeout(handshake_timeout: Duration) -> Self {
        Self {
            mutators: RwLock::new(Vec::new()),
            arrivals: Arc::new(Arrivals::default()),
            next_id: AtomicUsize::new(0),
            handshake_timeout,
        }
    }

    /// Register the calling mutator thread
    pub fn register_mutator(&self) -> Arc<MutatorHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = Arc::new(MutatorHandle::new(id, Arc::clone(&self.arrivals)));
        self.mutators.write().push(Arc::clone(&handle));
        handle
    }

    /// Stop tracking a mutator thread
    pub fn unregister_mutator(&self, handle: &MutatorHandle) {
        self.mutators.write().retain(|m| m.id != handle.id);
    }

    /// Number of registered mutators
    pub fn mutator_count(&self) -> usize {
        self.mutators.read().len()
    }
}

impl Default for MutatorRendezvous {
    fn default() -> Self {
        Self::new()
    }
}

impl Safepoint for MutatorRendezvous {
    fn safepoint_begin(&self) {
        let mutators = self.mutators.read().clone();
        *self.arrivals.stopped.lock() = 0;
        for mutator in &mutators {
            mutator.request();
        }

        let deadline = Instant::now() + self.handshake_timeout;
        let mut stopped = self.arrivals.stopped.lock();
        while *stopped < mutators.len() {
            if self.arrivals.changed.wait_until(&mut stopped, deadline).timed_out() {
                // Continue rather than deadlock on a mutator that never polls
                tracing::warn!(
                    target: "otter::gc",
                    stopped = *stopped,
                    mutators = mutators.len(),
                    timeout_ms = self.handshake_timeout.as_millis() as u64,
                    "Mutators did not reach a safe point in time"
                );
                break;
            }
        }
    }

    fn safepoint_end(&self) {
        for mutator in self.mutators.read().iter() {
            mutator.release();
        }
    }
}

/// Safepoint check, call periodically in mutator code
#[inline]
pub fn safepoint_poll(mutator: &MutatorHandle) {
    mutator.poll();
}
