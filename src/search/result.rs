//! Search outcome types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::candidate::CandidateSolution;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The wall-clock budget expired.
    TimeBudget,
    /// The total cycle limit was reached.
    CycleLimit,
    /// The incumbent reached the trivial lower bound.
    LowerBoundReached,
    /// Stopped from outside through a [`CancellationController`](super::CancellationController).
    Interrupted,
    /// Zero tasks or a single processor; the seed is returned as is.
    Degenerate,
}

impl TerminationReason {
    /// Compact non-zero code for atomic storage.
    pub(crate) fn code(self) -> u8 {
        match self {
            TerminationReason::TimeBudget => 1,
            TerminationReason::CycleLimit => 2,
            TerminationReason::LowerBoundReached => 3,
            TerminationReason::Interrupted => 4,
            TerminationReason::Degenerate => 5,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TerminationReason::TimeBudget),
            2 => Some(TerminationReason::CycleLimit),
            3 => Some(TerminationReason::LowerBoundReached),
            4 => Some(TerminationReason::Interrupted),
            5 => Some(TerminationReason::Degenerate),
            _ => None,
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::TimeBudget => "time budget expired",
            TerminationReason::CycleLimit => "cycle limit reached",
            TerminationReason::LowerBoundReached => "lower bound reached",
            TerminationReason::Interrupted => "interrupted",
            TerminationReason::Degenerate => "degenerate instance",
        };
        f.write_str(s)
    }
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Worker cycles completed across all threads.
    pub cycles: u64,
    /// Candidates pushed to the queue, seed copies included.
    pub pushes: u64,
    /// Pushes that improved the incumbent.
    pub improvements: u64,
    /// Worker threads launched.
    pub workers: usize,
    /// Makespan of the construction seed.
    pub seed_makespan: u64,
    /// Makespan of the returned candidate.
    pub best_makespan: u64,
}

/// Result of [`Engine::run`](super::Engine::run).
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best candidate found (the seed if nothing better turned up).
    pub best: CandidateSolution,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Run counters.
    pub stats: SearchStats,
    /// Why the run stopped.
    pub termination: TerminationReason,
}

impl SearchOutcome {
    /// Makespan of the best candidate.
    pub fn makespan(&self) -> u64 {
        self.best.makespan()
    }

    /// Improvement over the seed, in time units.
    pub fn improvement(&self) -> u64 {
        self.stats.seed_makespan.saturating_sub(self.best.makespan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        for reason in [
            TerminationReason::TimeBudget,
            TerminationReason::CycleLimit,
            TerminationReason::LowerBoundReached,
            TerminationReason::Interrupted,
            TerminationReason::Degenerate,
        ] {
            assert_ne!(reason.code(), 0);
            assert_eq!(TerminationReason::from_code(reason.code()), Some(reason));
        }
        assert_eq!(TerminationReason::from_code(0), None);
    }

    #[test]
    fn test_stats_serialization() {
        let stats = SearchStats {
            cycles: 12,
            pushes: 40,
            improvements: 3,
            workers: 4,
            seed_makespan: 13,
            best_makespan: 10,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["cycles"], 12);
        assert_eq!(json["best_makespan"], 10);
        let reason = serde_json::to_string(&TerminationReason::LowerBoundReached).unwrap();
        assert_eq!(reason, "\"LowerBoundReached\"");
    }
}
