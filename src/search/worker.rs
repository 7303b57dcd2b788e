//! Worker loop.
//!
//! # Algorithm
//!
//! Each cycle:
//! 1. Pop a parent from the queue (give up if the run has stopped).
//! 2. Clone it `population_size` times and mutate every clone.
//! 3. Keep the `best_per_thread` lowest-score clones (stable on ties).
//! 4. Cross each survivor with its partner.
//! 5. Push every child and report the queue's best.
//!
//! The stop signal is checked at the top of every cycle; a parent popped
//! by a cycle that then sees the signal is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use rand::rngs::SmallRng;
use tracing::debug;

use super::cancellation::CancellationController;
use super::candidate::CandidateSolution;
use super::config::EngineConfig;
use super::operators::SearchOperators;
use super::progress::ProgressSink;
use super::queue::SolutionQueue;
use super::result::TerminationReason;

/// State shared by every worker of a run.
pub(crate) struct SharedState<'a, P: ?Sized> {
    pub queue: &'a SolutionQueue,
    pub stop: &'a CancellationController,
    pub config: &'a EngineConfig,
    pub operators: SearchOperators,
    pub lower_bound: u64,
    pub cycles: &'a AtomicU64,
    pub progress: &'a P,
}

/// Per-worker summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerReport {
    pub cycles: u64,
}

/// Stops the run if the owning worker unwinds, so its siblings and the
/// timer do not wait on a signal nobody will set.
struct StopOnPanic<'a>(&'a CancellationController);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.stop(TerminationReason::Interrupted);
        }
    }
}

/// Runs one worker until the stop signal is set.
pub(crate) fn run_worker<P>(id: usize, mut rng: SmallRng, shared: &SharedState<'_, P>) -> WorkerReport
where
    P: ProgressSink + ?Sized,
{
    let _guard = StopOnPanic(shared.stop);
    let config = shared.config;
    let mut cycles = 0u64;

    while !shared.stop.is_stopped() {
        let Some(parent) = shared.queue.pop_unless_stopped(shared.stop) else {
            break;
        };

        let mut population: Vec<CandidateSolution> = (0..config.population_size)
            .map(|_| {
                let mut clone = parent.clone();
                shared.operators.mutate(&mut clone, &mut rng);
                clone
            })
            .collect();
        population.sort_by_key(CandidateSolution::score);
        population.truncate(config.best_per_thread);

        for child in shared.operators.recombine(&population, &parent) {
            shared.queue.push(child);
            shared.queue.report_best(|best| shared.progress.on_progress(best));
        }
        cycles += 1;

        if config.stop_at_lower_bound
            && shared
                .queue
                .best_makespan()
                .is_some_and(|best| best <= shared.lower_bound)
        {
            shared.stop.stop(TerminationReason::LowerBoundReached);
        }

        let total = shared.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        if config.cycle_limit.is_some_and(|limit| total >= limit) {
            shared.stop.stop(TerminationReason::CycleLimit);
        }
    }

    debug!(worker = id, cycles, "worker stopped");
    WorkerReport { cycles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProblemInstance;
    use crate::search::NoProgress;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn seed() -> CandidateSolution {
        let inst = Arc::new(ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap());
        CandidateSolution::from_assignment(inst, vec![0; 8]).unwrap()
    }

    #[test]
    fn test_worker_respects_cycle_limit() {
        let queue = SolutionQueue::new(16);
        queue.push(seed());
        let stop = CancellationController::new();
        let config = EngineConfig::default()
            .with_population(8)
            .with_survivors(3)
            .with_cycle_limit(5)
            .with_stop_at_lower_bound(false);
        let cycles = AtomicU64::new(0);
        let shared = SharedState {
            queue: &queue,
            stop: &stop,
            config: &config,
            operators: config.operators(),
            lower_bound: 10,
            cycles: &cycles,
            progress: &NoProgress,
        };

        let report = run_worker(0, SmallRng::seed_from_u64(42), &shared);
        assert_eq!(report.cycles, 5);
        assert_eq!(stop.reason(), Some(TerminationReason::CycleLimit));
        // One seed push plus three children per cycle.
        assert_eq!(queue.pushes(), 1 + 5 * 3);
        assert!(queue.best_makespan().unwrap() < 30);
    }

    #[test]
    fn test_worker_exits_when_already_stopped() {
        let queue = SolutionQueue::new(4);
        queue.push(seed());
        let stop = CancellationController::new();
        stop.interrupt();
        let config = EngineConfig::default();
        let cycles = AtomicU64::new(0);
        let shared = SharedState {
            queue: &queue,
            stop: &stop,
            config: &config,
            operators: config.operators(),
            lower_bound: 10,
            cycles: &cycles,
            progress: &NoProgress,
        };

        let report = run_worker(3, SmallRng::seed_from_u64(1), &shared);
        assert_eq!(report, WorkerReport { cycles: 0 });
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_worker_stops_at_lower_bound() {
        let queue = SolutionQueue::new(64);
        queue.push(seed());
        let stop = CancellationController::new();
        let config = EngineConfig::default().with_population(16).with_survivors(4);
        let cycles = AtomicU64::new(0);
        let shared = SharedState {
            queue: &queue,
            stop: &stop,
            config: &config,
            operators: config.operators(),
            // Any improvement on the seed counts as reaching this bound.
            lower_bound: 29,
            cycles: &cycles,
            progress: &NoProgress,
        };

        run_worker(0, SmallRng::seed_from_u64(7), &shared);
        assert_eq!(stop.reason(), Some(TerminationReason::LowerBoundReached));
        assert!(queue.best_makespan().unwrap() <= 29);
    }
}
