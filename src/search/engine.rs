//! Search engine: seeds the queue, runs the workers, returns the best.
//!
//! # Algorithm
//!
//! 1. Validate the configuration; build and check the heuristic seed.
//! 2. Short-circuit degenerate instances (no tasks, or one processor).
//! 3. Create a queue of capacity ≥ `threads_count × population_size` and
//!    push `threads_count` copies of the seed.
//! 4. Arm the timer with the budget, if any.
//! 5. Run `threads_count` workers on scoped threads and join them.
//! 6. Return the incumbent, or the seed if nothing was ever pushed.
//!
//! # Reference
//! Talbi (2009), "Metaheuristics: From Design to Implementation", Ch. 6
//! (parallel independent multi-start with a shared solution pool)

use std::panic;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{info, warn};

use super::cancellation::CancellationController;
use super::candidate::{AssignmentError, CandidateSolution};
use super::config::EngineConfig;
use super::progress::ProgressSink;
use super::queue::SolutionQueue;
use super::result::{SearchOutcome, SearchStats, TerminationReason};
use super::worker::{run_worker, SharedState, WorkerReport};
use crate::construction::ConstructionHeuristic;
use crate::models::ProblemInstance;
use crate::validation::{validate_config, ValidationError};

/// Errors that prevent a run from starting.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration failed validation.
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfiguration(Vec<ValidationError>),
    /// The construction heuristic returned something that is not a partition.
    #[error("heuristic {heuristic} produced an invalid seed: {source}")]
    InvalidSeed {
        /// Heuristic name.
        heuristic: &'static str,
        /// What was wrong with the seed.
        source: AssignmentError,
    },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Concurrent anytime P||Cmax search.
///
/// # Example
///
/// ```
/// use u_pcmax::construction::rules::Greedy;
/// use u_pcmax::models::ProblemInstance;
/// use u_pcmax::search::{Engine, EngineConfig, NoProgress};
///
/// let instance = ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap();
/// let config = EngineConfig::default()
///     .with_threads(2)
///     .with_cycle_limit(200)
///     .with_seed(42);
///
/// let outcome = Engine::new(config).run(instance, &Greedy, &NoProgress).unwrap();
/// assert!(outcome.makespan() >= 10 && outcome.makespan() <= 13);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    cancellation: CancellationController,
}

impl Engine {
    /// Creates an engine for one run.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancellation: CancellationController::new(),
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for stopping the run from another thread.
    pub fn cancellation(&self) -> CancellationController {
        self.cancellation.clone()
    }

    /// Runs the search to completion.
    ///
    /// Returns once a stop condition fires: the time budget, the cycle
    /// limit, the lower bound, or an external interrupt. With none of these
    /// configured the run only ends when interrupted.
    pub fn run<H, P>(
        self,
        instance: impl Into<Arc<ProblemInstance>>,
        heuristic: &H,
        progress: &P,
    ) -> Result<SearchOutcome, EngineError>
    where
        H: ConstructionHeuristic + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let config = &self.config;
        let stop = &self.cancellation;
        validate_config(config).map_err(EngineError::InvalidConfiguration)?;

        let started = Instant::now();
        let instance: Arc<ProblemInstance> = instance.into();
        let seed = CandidateSolution::from_processors(
            Arc::clone(&instance),
            heuristic.construct(&instance),
        )
        .map_err(|source| EngineError::InvalidSeed {
            heuristic: heuristic.name(),
            source,
        })?;
        let seed_makespan = seed.makespan();
        let lower_bound = instance.lower_bound();

        info!(
            tasks = instance.task_count(),
            processors = instance.processors_count(),
            heuristic = heuristic.name(),
            threads = config.threads_count,
            population = config.population_size,
            survivors = config.best_per_thread,
            seed_makespan,
            lower_bound,
            "search started"
        );

        if instance.is_degenerate() {
            warn!(
                tasks = instance.task_count(),
                processors = instance.processors_count(),
                "degenerate instance, returning the seed"
            );
            stop.stop(TerminationReason::Degenerate);
            progress.on_progress(&seed);
            let stats = SearchStats {
                seed_makespan,
                best_makespan: seed_makespan,
                ..SearchStats::default()
            };
            return Ok(self.finish(seed, started, stats));
        }

        let queue = SolutionQueue::new(config.requested_capacity());
        for _ in 0..config.threads_count {
            queue.push(seed.clone());
        }
        queue.report_best(|best| progress.on_progress(best));

        if config.stop_at_lower_bound && seed_makespan <= lower_bound {
            stop.stop(TerminationReason::LowerBoundReached);
        }
        if config.cycle_limit == Some(0) {
            stop.stop(TerminationReason::CycleLimit);
        }

        let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let cycles = AtomicU64::new(0);
        let shared = SharedState {
            queue: &queue,
            stop,
            config,
            operators: config.operators(),
            lower_bound,
            cycles: &cycles,
            progress,
        };

        let reports: Vec<WorkerReport> = thread::scope(|s| {
            if let Some(budget) = config.time_budget {
                s.spawn(move || stop.wait_for_budget(budget));
            }

            let handles: Vec<_> = (0..config.threads_count)
                .map(|id| {
                    let rng = SmallRng::seed_from_u64(base_seed.wrapping_add(id as u64));
                    let shared = &shared;
                    s.spawn(move || run_worker(id, rng, shared))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(report) => report,
                    Err(payload) => panic::resume_unwind(payload),
                })
                .collect()
        });

        let stats = SearchStats {
            cycles: reports.iter().map(|r| r.cycles).sum(),
            pushes: queue.pushes(),
            improvements: queue.improvements(),
            workers: reports.len(),
            seed_makespan,
            best_makespan: 0,
        };
        let best = queue.into_best().unwrap_or(seed);
        let stats = SearchStats {
            best_makespan: best.makespan(),
            ..stats
        };
        Ok(self.finish(best, started, stats))
    }

    fn finish(&self, best: CandidateSolution, started: Instant, stats: SearchStats) -> SearchOutcome {
        let elapsed = started.elapsed();
        let termination = self
            .cancellation
            .reason()
            .unwrap_or(TerminationReason::Interrupted);
        info!(
            makespan = best.makespan(),
            seed_makespan = stats.seed_makespan,
            cycles = stats.cycles,
            improvements = stats.improvements,
            elapsed_ms = elapsed.as_millis() as u64,
            termination = %termination,
            "search finished"
        );
        SearchOutcome {
            best,
            elapsed,
            stats,
            termination,
        }
    }
}

/// One-call search with explicit tunables.
///
/// Equivalent to building an [`EngineConfig`] from the arguments (all other
/// settings at their defaults) and calling [`Engine::run`]. Returns the best
/// candidate and the elapsed wall-clock time.
pub fn run<H, P>(
    instance: impl Into<Arc<ProblemInstance>>,
    heuristic: &H,
    threads_count: usize,
    population_size: usize,
    best_per_thread: usize,
    time_budget: Option<Duration>,
    progress: &P,
) -> Result<(CandidateSolution, Duration), EngineError>
where
    H: ConstructionHeuristic + ?Sized,
    P: ProgressSink + ?Sized,
{
    let mut config = EngineConfig::default()
        .with_threads(threads_count)
        .with_population(population_size)
        .with_survivors(best_per_thread);
    config.time_budget = time_budget;
    let outcome = Engine::new(config).run(instance, heuristic, progress)?;
    Ok((outcome.best, outcome.elapsed))
}
