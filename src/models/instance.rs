//! Problem instance model.
//!
//! An instance of P||Cmax: a number of identical processors and a list of
//! independent tasks with fixed durations. The task index is its identity.
//!
//! # Text Format
//!
//! ```text
//! <processors_count>
//! <tasks_count>
//! <duration_0>
//! <duration_1>
//! ...
//! ```
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or parsing an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// The instance declares no processors.
    #[error("number of processors must be > 0, not ({0})")]
    NoProcessors(usize),
    /// A header line is missing.
    #[error("missing {0} line")]
    MissingHeader(&'static str),
    /// A line could not be read as a non-negative integer.
    #[error("line {line}: expected a non-negative integer, found '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        value: String,
    },
    /// The declared task count disagrees with the durations present.
    #[error("declared number of tasks ({declared}) is not equal to the number of durations ({found})")]
    TaskCountMismatch {
        /// Count from the header.
        declared: usize,
        /// Durations actually listed.
        found: usize,
    },
    /// The durations sum past `u64::MAX`.
    #[error("sum of task durations overflows u64")]
    DurationOverflow,
}

/// An immutable P||Cmax instance.
///
/// Deserialization goes through [`ProblemInstance::new`], so every instance
/// has at least one processor and a total duration that fits in `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInstance")]
pub struct ProblemInstance {
    processors_count: usize,
    task_durations: Vec<u64>,
}

/// Unchecked wire form of [`ProblemInstance`].
#[derive(Deserialize)]
struct RawInstance {
    processors_count: usize,
    task_durations: Vec<u64>,
}

impl TryFrom<RawInstance> for ProblemInstance {
    type Error = InstanceError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Self::new(raw.processors_count, raw.task_durations)
    }
}

impl ProblemInstance {
    /// Creates an instance.
    ///
    /// Rejects a zero processor count and durations whose sum overflows.
    /// Every processor load is bounded by that sum, so load arithmetic on a
    /// valid instance cannot overflow.
    pub fn new(processors_count: usize, task_durations: Vec<u64>) -> Result<Self, InstanceError> {
        if processors_count == 0 {
            return Err(InstanceError::NoProcessors(processors_count));
        }
        task_durations
            .iter()
            .try_fold(0u64, |total, &d| total.checked_add(d))
            .ok_or(InstanceError::DurationOverflow)?;
        Ok(Self {
            processors_count,
            task_durations,
        })
    }

    /// Number of identical processors.
    #[inline]
    pub fn processors_count(&self) -> usize {
        self.processors_count
    }

    /// Task durations, indexed by task.
    #[inline]
    pub fn task_durations(&self) -> &[u64] {
        &self.task_durations
    }

    /// Duration of a single task.
    #[inline]
    pub fn duration(&self, task: usize) -> u64 {
        self.task_durations[task]
    }

    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.task_durations.len()
    }

    /// Sum of all durations.
    pub fn total_duration(&self) -> u64 {
        self.task_durations.iter().sum()
    }

    /// Longest single task (0 if there are no tasks).
    pub fn max_duration(&self) -> u64 {
        self.task_durations.iter().copied().max().unwrap_or(0)
    }

    /// Average processor load of a perfectly balanced assignment.
    pub fn mean_load(&self) -> f64 {
        self.total_duration() as f64 / self.processors_count as f64
    }

    /// Trivial lower bound on the optimal makespan.
    ///
    /// `max(ceil(sum / m), max duration)`. No schedule can beat either term.
    pub fn lower_bound(&self) -> u64 {
        let m = self.processors_count as u64;
        self.total_duration().div_ceil(m).max(self.max_duration())
    }

    /// Whether the search has nothing to improve (no tasks or one processor).
    pub fn is_degenerate(&self) -> bool {
        self.task_durations.is_empty() || self.processors_count == 1
    }

    /// Renders the instance in the line-based text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.processors_count);
        let _ = writeln!(out, "{}", self.task_durations.len());
        for d in &self.task_durations {
            let _ = writeln!(out, "{d}");
        }
        out
    }
}

fn parse_line(line_no: usize, text: &str) -> Result<u64, InstanceError> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| InstanceError::InvalidNumber {
            line: line_no,
            value: text.trim().to_string(),
        })
}

impl FromStr for ProblemInstance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (line, text) = lines
            .next()
            .ok_or(InstanceError::MissingHeader("processors count"))?;
        let processors_count = parse_line(line, text)? as usize;

        let (line, text) = lines
            .next()
            .ok_or(InstanceError::MissingHeader("tasks count"))?;
        let declared = parse_line(line, text)? as usize;

        let durations = lines
            .map(|(line, text)| parse_line(line, text))
            .collect::<Result<Vec<_>, _>>()?;

        if durations.len() != declared {
            return Err(InstanceError::TaskCountMismatch {
                declared,
                found: durations.len(),
            });
        }

        Self::new(processors_count, durations)
    }
}
