//! Identical parallel machine scheduling (P||Cmax) for the U-Engine ecosystem.
//!
//! Assigns independent tasks with fixed durations to identical processors,
//! minimizing the makespan. A construction heuristic builds a seed; a pool
//! of worker threads then improves it under a time budget, sharing
//! candidates through a bounded concurrent priority queue.
//!
//! # Modules
//!
//! - **`models`**: `ProblemInstance` (with its text format), `Schedule`
//! - **`construction`**: Seed heuristics: Greedy, LPT, round robin, closures
//! - **`search`**: `CandidateSolution`, operators, queue, cancellation, `Engine`
//! - **`kpi`**: Solution quality metrics (gap, utilization, imbalance)
//! - **`generator`**: Instances with a known optimal makespan
//! - **`validation`**: Engine configuration checks
//!
//! # Logging
//!
//! The engine reports through `tracing`; install a subscriber to see it.
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Alba (2005), "Parallel Metaheuristics: A New Class of Algorithms"

pub mod construction;
pub mod generator;
pub mod kpi;
pub mod models;
pub mod search;
pub mod validation;
