//! Construction heuristics for seeding the search.
//!
//! A construction heuristic maps an instance to one feasible assignment,
//! given as per-processor task lists. The engine only needs every task to
//! appear exactly once; quality matters only for how far the search has
//! to travel.
//!
//! # Usage
//!
//! ```
//! use u_pcmax::construction::{ConstructionHeuristic, rules};
//! use u_pcmax::models::ProblemInstance;
//!
//! let instance = ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap();
//! let processors = rules::Lpt.construct(&instance);
//! assert_eq!(processors.len(), 3);
//! ```
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5

pub mod rules;

use crate::models::ProblemInstance;

/// Per-processor task lists: `processors[p]` holds the task indices on `p`.
pub type ProcessorTasks = Vec<Vec<usize>>;

/// Produces a feasible seed assignment for an instance.
pub trait ConstructionHeuristic: Send + Sync {
    /// Heuristic name (e.g., "LPT").
    fn name(&self) -> &'static str;

    /// Assigns every task to exactly one processor.
    fn construct(&self, instance: &ProblemInstance) -> ProcessorTasks;

    /// Heuristic description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

impl<F> ConstructionHeuristic for F
where
    F: Fn(&ProblemInstance) -> ProcessorTasks + Send + Sync,
{
    fn name(&self) -> &'static str {
        "custom"
    }

    fn construct(&self, instance: &ProblemInstance) -> ProcessorTasks {
        self(instance)
    }
}

/// Assigns tasks, in the given order, to the currently least-loaded
/// processor (lowest index on ties).
pub fn list_schedule(
    instance: &ProblemInstance,
    order: impl IntoIterator<Item = usize>,
) -> ProcessorTasks {
    let m = instance.processors_count();
    let mut loads = vec![0u64; m];
    let mut processors = vec![Vec::new(); m];

    for task in order {
        let target = least_loaded(&loads);
        loads[target] += instance.duration(task);
        processors[target].push(task);
    }

    processors
}

/// Index of the minimum load, first index on ties.
pub(crate) fn least_loaded(loads: &[u64]) -> usize {
    let mut best = 0;
    for (p, &load) in loads.iter().enumerate().skip(1) {
        if load < loads[best] {
            best = p;
        }
    }
    best
}
