//! Solution quality metrics (KPIs).
//!
//! Computes standard P||Cmax indicators from a candidate solution.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Largest processor load |
//! | Lower Bound | max(ceil(sum / m), max duration) |
//! | Gap | C_max - lower bound |
//! | Relative Gap | Gap / lower bound |
//! | Utilization | load / C_max, per processor |
//! | Load Imbalance | Largest load - smallest load |
//! | Idle Time | Sum of (C_max - load) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 5.1: The Makespan without Preemptions

use serde::{Deserialize, Serialize};

use crate::search::CandidateSolution;

/// Solution performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionKpi {
    /// Largest processor load.
    pub makespan: u64,
    /// Trivial lower bound of the instance.
    pub lower_bound: u64,
    /// `makespan - lower_bound`.
    pub gap: u64,
    /// `gap / lower_bound` (0.0 when the bound is 0).
    pub relative_gap: f64,
    /// Per-processor utilization (0.0..1.0).
    pub utilization_by_processor: Vec<f64>,
    /// Average processor utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Largest load minus smallest load.
    pub load_imbalance: u64,
    /// Total idle time before `makespan`, over all processors.
    pub idle_time: u64,
}

impl SolutionKpi {
    /// Computes KPIs for a candidate.
    pub fn calculate(solution: &CandidateSolution) -> Self {
        let makespan = solution.makespan();
        let lower_bound = solution.instance().lower_bound();
        let loads = solution.processor_loads();

        let gap = makespan.saturating_sub(lower_bound);
        let relative_gap = if lower_bound == 0 {
            0.0
        } else {
            gap as f64 / lower_bound as f64
        };

        // An empty schedule counts as fully utilized.
        let utilization_by_processor: Vec<f64> = loads
            .iter()
            .map(|&load| {
                if makespan == 0 {
                    1.0
                } else {
                    load as f64 / makespan as f64
                }
            })
            .collect();
        let avg_utilization = if utilization_by_processor.is_empty() {
            0.0
        } else {
            utilization_by_processor.iter().sum::<f64>() / utilization_by_processor.len() as f64
        };

        let min_load = loads.iter().copied().min().unwrap_or(0);
        let idle_time = loads.iter().map(|&load| makespan - load).sum();

        Self {
            makespan,
            lower_bound,
            gap,
            relative_gap,
            utilization_by_processor,
            avg_utilization,
            load_imbalance: makespan - min_load,
            idle_time,
        }
    }

    /// Whether the solution is provably optimal (it meets the lower bound).
    pub fn is_optimal(&self) -> bool {
        self.gap == 0
    }

    /// Whether the solution meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_relative_gap: f64, min_utilization: f64) -> bool {
        self.relative_gap <= max_relative_gap && self.avg_utilization >= min_utilization
    }
}
