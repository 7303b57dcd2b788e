//! Write-once stop signal shared by the engine, its timer, and its workers.
//!
//! The state moves `Unset → Stopped(reason)` exactly once. Reads are a
//! single atomic load; the first `stop` wins and later calls are ignored,
//! so the recorded reason is always the one that actually ended the run.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use super::result::TerminationReason;

const UNSET: u8 = 0;

#[derive(Debug, Default)]
struct Signal {
    state: AtomicU8,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Cloneable handle to a run's stop signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationController {
    signal: Arc<Signal>,
}

impl CancellationController {
    /// Creates an unset controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the run. Returns `true` if this call set the signal.
    pub fn stop(&self, reason: TerminationReason) -> bool {
        let won = self
            .signal
            .state
            .compare_exchange(UNSET, reason.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            let _guard = self
                .signal
                .lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.signal.wake.notify_all();
        }
        won
    }

    /// Interrupts the run from outside.
    pub fn interrupt(&self) -> bool {
        self.stop(TerminationReason::Interrupted)
    }

    /// Whether the signal has been set.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.signal.state.load(Ordering::Acquire) != UNSET
    }

    /// The reason recorded by the winning `stop`, if any.
    pub fn reason(&self) -> Option<TerminationReason> {
        TerminationReason::from_code(self.signal.state.load(Ordering::Acquire))
    }

    /// Sleeps until `budget` elapses or the signal is set, whichever comes
    /// first. On expiry the run is stopped with [`TerminationReason::TimeBudget`].
    pub fn wait_for_budget(&self, budget: Duration) {
        let guard = self
            .signal
            .lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, timeout) = self
            .signal
            .wake
            .wait_timeout_while(guard, budget, |_| !self.is_stopped())
            .unwrap_or_else(PoisonError::into_inner);
        drop(guard);
        if timeout.timed_out() {
            self.stop(TerminationReason::TimeBudget);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_first_stop_wins() {
        let c = CancellationController::new();
        assert!(!c.is_stopped());
        assert_eq!(c.reason(), None);

        assert!(c.stop(TerminationReason::CycleLimit));
        assert!(!c.stop(TerminationReason::TimeBudget));
        assert!(!c.interrupt());

        assert!(c.is_stopped());
        assert_eq!(c.reason(), Some(TerminationReason::CycleLimit));
    }

    #[test]
    fn test_clones_share_state() {
        let c = CancellationController::new();
        let other = c.clone();
        other.interrupt();
        assert_eq!(c.reason(), Some(TerminationReason::Interrupted));
    }

    #[test]
    fn test_budget_expiry() {
        let c = CancellationController::new();
        c.wait_for_budget(Duration::from_millis(20));
        assert_eq!(c.reason(), Some(TerminationReason::TimeBudget));
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let c = CancellationController::new();
        c.wait_for_budget(Duration::ZERO);
        assert!(c.is_stopped());
    }

    #[test]
    fn test_timer_woken_early() {
        let c = CancellationController::new();
        let timer = c.clone();
        let start = Instant::now();
        let handle = thread::spawn(move || timer.wait_for_budget(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(10));
        c.interrupt();
        handle.join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(c.reason(), Some(TerminationReason::Interrupted));
    }
}
