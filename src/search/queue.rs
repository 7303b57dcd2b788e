//! Bounded concurrent priority queue of candidates.
//!
//! Holds at most `capacity` candidates in ascending makespan order; a push
//! that overflows discards the worst. Alongside the queue sits the
//! incumbent: the best candidate ever pushed. Workers pop the queue's
//! minimum, so the queue alone cannot answer "best so far"; the incumbent
//! can.
//!
//! # Locking
//!
//! The queue and the incumbent have separate mutexes and are never held
//! together. `best_makespan` is a relaxed atomic hint that lets a push skip
//! the incumbent lock when it is clearly not an improvement; the mutex is
//! the source of truth. Progress reports run under a third lock that no
//! push takes, so a slow sink delays only other reports. Mutation and
//! crossover always run outside every lock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::cancellation::CancellationController;
use super::candidate::CandidateSolution;

/// How long a blocked `pop_unless_stopped` sleeps before re-checking the
/// stop signal.
const STOP_POLL: Duration = Duration::from_millis(10);

/// Sentinel for "no incumbent yet".
const NO_INCUMBENT: u64 = u64::MAX;

/// Up to `capacity` best-known candidates, safe for concurrent push and pop.
#[derive(Debug)]
pub struct SolutionQueue {
    capacity: usize,
    entries: Mutex<VecDeque<CandidateSolution>>,
    available: Condvar,
    incumbent: Mutex<Option<CandidateSolution>>,
    best_makespan: AtomicU64,
    last_reported: Mutex<u64>,
    pushes: AtomicU64,
    improvements: AtomicU64,
}

impl SolutionQueue {
    /// Creates an empty queue. Capacity is the next power of two at or
    /// above `requested` (at least 1).
    pub fn new(requested: usize) -> Self {
        let capacity = requested.max(1).next_power_of_two();
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            available: Condvar::new(),
            incumbent: Mutex::new(None),
            best_makespan: AtomicU64::new(NO_INCUMBENT),
            last_reported: Mutex::new(NO_INCUMBENT),
            pushes: AtomicU64::new(0),
            improvements: AtomicU64::new(0),
        }
    }

    /// Maximum number of queued candidates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a candidate, discarding the worst on overflow.
    ///
    /// Returns `true` if the candidate became the new incumbent.
    pub fn push(&self, candidate: CandidateSolution) -> bool {
        self.pushes.fetch_add(1, Ordering::Relaxed);
        let improved = self.try_install(&candidate);

        let mut entries = self.lock_entries();
        let makespan = candidate.makespan();
        // Equal makespans keep arrival order.
        let at = entries.partition_point(|c| c.makespan() <= makespan);
        if at < self.capacity {
            entries.insert(at, candidate);
            entries.truncate(self.capacity);
            drop(entries);
            self.available.notify_one();
        }
        improved
    }

    /// Removes and returns the minimum, blocking while the queue is empty.
    pub fn pop(&self) -> CandidateSolution {
        let mut entries = self.lock_entries();
        loop {
            if let Some(candidate) = entries.pop_front() {
                return candidate;
            }
            entries = self
                .available
                .wait(entries)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`pop`](Self::pop), but gives up with `None` once `stop` is set.
    pub fn pop_unless_stopped(&self, stop: &CancellationController) -> Option<CandidateSolution> {
        let mut entries = self.lock_entries();
        loop {
            if stop.is_stopped() {
                return None;
            }
            if let Some(candidate) = entries.pop_front() {
                return Some(candidate);
            }
            entries = self
                .available
                .wait_timeout(entries, STOP_POLL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Removes and returns the minimum without blocking.
    pub fn try_pop(&self) -> Option<CandidateSolution> {
        self.lock_entries().pop_front()
    }

    /// Number of queued candidates.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Makespans of the queued candidates, best first.
    pub fn makespans(&self) -> Vec<u64> {
        self.lock_entries().iter().map(CandidateSolution::makespan).collect()
    }

    /// Copy of the best candidate pushed so far.
    pub fn peek_best(&self) -> Option<CandidateSolution> {
        self.lock_incumbent().clone()
    }

    /// Makespan of the best candidate pushed so far.
    ///
    /// Lock-free unless the hint holds the sentinel, which a real makespan
    /// of `u64::MAX` shares.
    pub fn best_makespan(&self) -> Option<u64> {
        match self.best_makespan.load(Ordering::Relaxed) {
            NO_INCUMBENT => self.lock_incumbent().as_ref().map(CandidateSolution::makespan),
            makespan => Some(makespan),
        }
    }

    /// Hands a copy of the incumbent to `f`.
    ///
    /// The copy is taken under the incumbent lock, then `f` runs after that
    /// lock is released. Reports are serialized and a copy worse than one
    /// already reported is dropped, so the makespans `f` sees never increase.
    /// Returns `true` if `f` ran.
    pub fn report_best<F: FnOnce(&CandidateSolution)>(&self, f: F) -> bool {
        let Some(best) = self.peek_best() else {
            return false;
        };
        let mut last = self
            .last_reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if best.makespan() > *last {
            return false;
        }
        *last = best.makespan();
        f(&best);
        true
    }

    /// Total pushes, rejected ones included.
    pub fn pushes(&self) -> u64 {
        self.pushes.load(Ordering::Relaxed)
    }

    /// Pushes that installed a new incumbent.
    pub fn improvements(&self) -> u64 {
        self.improvements.load(Ordering::Relaxed)
    }

    /// Consumes the queue, returning the incumbent.
    pub fn into_best(self) -> Option<CandidateSolution> {
        self.incumbent
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn try_install(&self, candidate: &CandidateSolution) -> bool {
        let makespan = candidate.makespan();
        // Ties still take the lock: the hint may be the sentinel.
        if makespan > self.best_makespan.load(Ordering::Relaxed) {
            return false;
        }

        let mut incumbent = self.lock_incumbent();
        // The hint may be stale; compare against the stored incumbent.
        if let Some(current) = incumbent.as_ref() {
            if makespan >= current.makespan() {
                return false;
            }
        }
        *incumbent = Some(candidate.clone());
        self.best_makespan.store(makespan, Ordering::Relaxed);
        drop(incumbent);

        self.improvements.fetch_add(1, Ordering::Relaxed);
        debug!(makespan, "new incumbent");
        true
    }

    fn lock_entries(&self) -> MutexGuard<'_, VecDeque<CandidateSolution>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_incumbent(&self) -> MutexGuard<'_, Option<CandidateSolution>> {
        self.incumbent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
