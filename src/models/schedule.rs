//! Schedule (exported solution) model.
//!
//! A schedule lays every task out on a processor timeline. Tasks on the
//! same processor run back to back from t=0 in list order; identical
//! processors and independent tasks make any order equivalent for makespan.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5

use serde::{Deserialize, Serialize};

/// A complete timeline for a P||Cmax solution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Number of processors in the instance (some may stay idle).
    pub processors_count: usize,
    /// Task placements, grouped by processor in timeline order.
    pub slots: Vec<ScheduledTask>,
}

/// A task placed on a processor during `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Task index in the instance.
    pub task: usize,
    /// Processor index.
    pub processor: usize,
    /// Start time.
    pub start: u64,
    /// End time.
    pub end: u64,
}

impl ScheduledTask {
    /// Duration of the placement.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

impl Schedule {
    /// Creates an empty schedule for the given processor count.
    pub fn new(processors_count: usize) -> Self {
        Self {
            processors_count,
            slots: Vec::new(),
        }
    }

    /// Builds a schedule from per-processor task lists.
    pub fn from_processors(processors: &[Vec<usize>], durations: &[u64]) -> Self {
        let mut schedule = Self::new(processors.len());
        for (processor, tasks) in processors.iter().enumerate() {
            let mut clock = 0;
            for &task in tasks {
                let end = clock + durations[task];
                schedule.slots.push(ScheduledTask {
                    task,
                    processor,
                    start: clock,
                    end,
                });
                clock = end;
            }
        }
        schedule
    }

    /// Makespan: latest end time across all slots.
    pub fn makespan(&self) -> u64 {
        self.slots.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// Slots placed on one processor.
    pub fn slots_for_processor(&self, processor: usize) -> Vec<&ScheduledTask> {
        self.slots
            .iter()
            .filter(|s| s.processor == processor)
            .collect()
    }

    /// Finds the slot for a task.
    pub fn slot_for_task(&self, task: usize) -> Option<&ScheduledTask> {
        self.slots.iter().find(|s| s.task == task)
    }

    /// Busy time per processor.
    pub fn processor_loads(&self) -> Vec<u64> {
        let mut loads = vec![0; self.processors_count];
        for s in &self.slots {
            loads[s.processor] += s.duration();
        }
        loads
    }

    /// Number of scheduled tasks.
    pub fn task_count(&self) -> usize {
        self.slots.len()
    }
}
