//! Concurrent anytime local search for P||Cmax.
//!
//! A pool of worker threads improves a shared population of candidate
//! assignments. Workers coordinate only through a bounded priority queue;
//! each candidate keeps its loads and makespan up to date as it is
//! mutated, so scoring is O(1).
//!
//! # Components
//!
//! - [`CandidateSolution`]: assignment with cached loads and makespan
//! - [`SearchOperators`]: mutation and crossover pairing strategies
//! - [`SolutionQueue`]: bounded concurrent priority queue plus incumbent
//! - [`CancellationController`]: write-once stop signal
//! - [`Engine`]: seeds the queue, runs the workers, returns the best
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use u_pcmax::construction::rules::Lpt;
//! use u_pcmax::models::ProblemInstance;
//! use u_pcmax::search::{Engine, EngineConfig, NoProgress, TerminationReason};
//!
//! let instance = ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap();
//! let config = EngineConfig::default()
//!     .with_threads(2)
//!     .with_time_budget(Duration::from_millis(100));
//!
//! let outcome = Engine::new(config).run(instance, &Lpt, &NoProgress).unwrap();
//! assert_eq!(outcome.makespan(), 10);
//! assert_eq!(outcome.termination, TerminationReason::LowerBoundReached);
//! ```
//!
//! # Reference
//! Alba (2005), "Parallel Metaheuristics: A New Class of Algorithms"

mod cancellation;
mod candidate;
mod config;
mod engine;
mod operators;
mod progress;
mod queue;
mod result;
mod worker;

pub use cancellation::CancellationController;
pub use candidate::{AssignmentError, CandidateSolution};
pub use config::EngineConfig;
pub use engine::{run, Engine, EngineError};
pub use operators::{
    load_weighted_mutation, uniform_mutation, MutationStrategy, PairingStrategy, SearchOperators,
};
pub use progress::{NoProgress, ProgressSink};
pub use queue::SolutionQueue;
pub use result::{SearchOutcome, SearchStats, TerminationReason};
