//! Built-in construction heuristics.
//!
//! - **Greedy**: list scheduling in task index order
//! - **LPT**: list scheduling by descending duration
//! - **Round robin**: task `i` on processor `i mod m`
//!
//! # References
//! - Graham (1966), "Bounds for Certain Multiprocessing Anomalies"
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use super::{list_schedule, ConstructionHeuristic, ProcessorTasks};
use crate::models::ProblemInstance;

/// Greedy list scheduling.
///
/// Takes tasks in index order and places each on the least-loaded
/// processor. A (2 - 1/m)-approximation.
///
/// # Reference
/// Graham (1966)
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl ConstructionHeuristic for Greedy {
    fn name(&self) -> &'static str {
        "GREEDY"
    }

    fn construct(&self, instance: &ProblemInstance) -> ProcessorTasks {
        list_schedule(instance, 0..instance.task_count())
    }

    fn description(&self) -> &'static str {
        "Greedy list scheduling"
    }
}

/// Longest Processing Time first.
///
/// Sorts tasks by descending duration (stable on ties), then list-schedules.
/// A (4/3 - 1/3m)-approximation.
///
/// # Reference
/// Graham (1969)
#[derive(Debug, Clone, Copy, Default)]
pub struct Lpt;

impl ConstructionHeuristic for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn construct(&self, instance: &ProblemInstance) -> ProcessorTasks {
        let mut order: Vec<usize> = (0..instance.task_count()).collect();
        order.sort_by_key(|&t| std::cmp::Reverse(instance.duration(t)));
        list_schedule(instance, order)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Round-robin placement, ignoring durations.
///
/// Useful as a deliberately weak seed when measuring the search itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl ConstructionHeuristic for RoundRobin {
    fn name(&self) -> &'static str {
        "ROUND_ROBIN"
    }

    fn construct(&self, instance: &ProblemInstance) -> ProcessorTasks {
        let m = instance.processors_count();
        let mut processors = vec![Vec::new(); m];
        for task in 0..instance.task_count() {
            processors[task % m].push(task);
        }
        processors
    }

    fn description(&self) -> &'static str {
        "Round robin"
    }
}
