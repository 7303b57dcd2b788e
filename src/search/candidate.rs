//! Candidate solution with incrementally maintained loads.
//!
//! # Representation
//!
//! A candidate keeps the assignment twice:
//! - **assignment**: task index → processor index
//! - **processors**: processor index → task indices (timeline order)
//!
//! plus `processor_load[p]` and `makespan = max(processor_load)`. Building a
//! candidate is the only O(n) step; a relocation touches two list entries,
//! two loads, and one O(m) max scan.
//!
//! # Reference
//! França et al. (1994), "A tabu search heuristic for the multiprocessor
//! scheduling problem with sequence dependent setup times" (load-delta moves)

use std::cmp::Reverse;
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use super::operators::MutationStrategy;
use crate::construction::{least_loaded, ProcessorTasks};
use crate::models::{ProblemInstance, Schedule};

/// Reasons an assignment is not a valid P||Cmax solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Assignment length differs from the task count.
    #[error("assignment covers {found} tasks, instance has {expected}")]
    WrongLength {
        /// Task count of the instance.
        expected: usize,
        /// Length supplied.
        found: usize,
    },
    /// Processor list count differs from the processor count.
    #[error("{found} processor lists supplied, instance has {expected} processors")]
    WrongProcessorCount {
        /// Processor count of the instance.
        expected: usize,
        /// Lists supplied.
        found: usize,
    },
    /// A task was placed on a processor that does not exist.
    #[error("task {task} assigned to processor {processor}, which does not exist")]
    ProcessorOutOfRange {
        /// Task index.
        task: usize,
        /// Offending processor index.
        processor: usize,
    },
    /// A task index outside the instance.
    #[error("task {0} does not exist")]
    UnknownTask(usize),
    /// A task appears more than once.
    #[error("task {0} is assigned more than once")]
    DuplicateTask(usize),
    /// A task is not assigned at all.
    #[error("task {0} is not assigned")]
    MissingTask(usize),
}

/// One feasible assignment with cached loads and makespan.
///
/// Lower score = better (minimization convention).
#[derive(Debug, Clone)]
pub struct CandidateSolution {
    instance: Arc<ProblemInstance>,
    assignment: Vec<usize>,
    processors: ProcessorTasks,
    processor_load: Vec<u64>,
    makespan: u64,
}

impl CandidateSolution {
    /// Builds a candidate from a task → processor mapping.
    pub fn from_assignment(
        instance: Arc<ProblemInstance>,
        assignment: Vec<usize>,
    ) -> Result<Self, AssignmentError> {
        let m = instance.processors_count();
        if assignment.len() != instance.task_count() {
            return Err(AssignmentError::WrongLength {
                expected: instance.task_count(),
                found: assignment.len(),
            });
        }

        let mut processors = vec![Vec::new(); m];
        for (task, &processor) in assignment.iter().enumerate() {
            if processor >= m {
                return Err(AssignmentError::ProcessorOutOfRange { task, processor });
            }
            processors[processor].push(task);
        }

        Ok(Self::from_parts(instance, assignment, processors))
    }

    /// Builds a candidate from per-processor task lists, keeping list order.
    pub fn from_processors(
        instance: Arc<ProblemInstance>,
        processors: ProcessorTasks,
    ) -> Result<Self, AssignmentError> {
        let m = instance.processors_count();
        let n = instance.task_count();
        if processors.len() != m {
            return Err(AssignmentError::WrongProcessorCount {
                expected: m,
                found: processors.len(),
            });
        }

        let mut assignment: Vec<Option<usize>> = vec![None; n];
        for (processor, tasks) in processors.iter().enumerate() {
            for &task in tasks {
                let slot = assignment
                    .get_mut(task)
                    .ok_or(AssignmentError::UnknownTask(task))?;
                if slot.is_some() {
                    return Err(AssignmentError::DuplicateTask(task));
                }
                *slot = Some(processor);
            }
        }
        if let Some(task) = assignment.iter().position(Option::is_none) {
            return Err(AssignmentError::MissingTask(task));
        }
        let assignment = assignment.into_iter().flatten().collect();

        Ok(Self::from_parts(instance, assignment, processors))
    }

    /// Single O(n) pass computing loads; inputs are already consistent.
    fn from_parts(
        instance: Arc<ProblemInstance>,
        assignment: Vec<usize>,
        processors: ProcessorTasks,
    ) -> Self {
        let mut processor_load = vec![0u64; instance.processors_count()];
        for (task, &processor) in assignment.iter().enumerate() {
            processor_load[processor] += instance.duration(task);
        }
        let makespan = processor_load.iter().copied().max().unwrap_or(0);
        Self {
            instance,
            assignment,
            processors,
            processor_load,
            makespan,
        }
    }

    /// The instance this candidate solves.
    #[inline]
    pub fn instance(&self) -> &Arc<ProblemInstance> {
        &self.instance
    }

    /// Task → processor mapping.
    #[inline]
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Processor → tasks mapping.
    #[inline]
    pub fn processors(&self) -> &[Vec<usize>] {
        &self.processors
    }

    /// Per-processor load.
    #[inline]
    pub fn processor_loads(&self) -> &[u64] {
        &self.processor_load
    }

    /// Maximum processor load.
    #[inline]
    pub fn makespan(&self) -> u64 {
        self.makespan
    }

    /// Ranking key (lower = better). Equal to the makespan.
    #[inline]
    pub fn score(&self) -> u64 {
        self.makespan
    }

    /// Number of processors.
    #[inline]
    pub fn processors_count(&self) -> usize {
        self.processor_load.len()
    }

    /// Lays the assignment out as a timeline.
    pub fn to_schedule(&self) -> Schedule {
        Schedule::from_processors(&self.processors, self.instance.task_durations())
    }

    /// Applies one mutation with the given strategy.
    ///
    /// Returns `true` if a task moved.
    pub fn mutate<R: Rng>(&mut self, strategy: MutationStrategy, rng: &mut R) -> bool {
        strategy.apply(self, rng)
    }

    /// Moves a random task of `source` to `destination`.
    ///
    /// The task lands at a random position of a non-empty destination, or is
    /// appended to an empty one. No-op (returns `false`) if `source` is empty
    /// or equal to `destination`.
    pub fn relocate<R: Rng>(&mut self, source: usize, destination: usize, rng: &mut R) -> bool {
        if source == destination || self.processors[source].is_empty() {
            return false;
        }

        let from = rng.random_range(0..self.processors[source].len());
        let task = self.processors[source].remove(from);

        let target = &mut self.processors[destination];
        if target.is_empty() {
            target.push(task);
        } else {
            let at = rng.random_range(0..=target.len());
            target.insert(at, task);
        }

        let duration = self.instance.duration(task);
        self.processor_load[source] -= duration;
        self.processor_load[destination] += duration;
        self.assignment[task] = destination;
        self.makespan = self.processor_load.iter().copied().max().unwrap_or(0);
        true
    }

    /// Structured recombination of two parents.
    ///
    /// # Algorithm
    /// 1. Collect every processor of both parents as (origin, index, load).
    /// 2. Order processors with load ≥ mean ascending by load, followed by
    ///    below-mean processors in descending load (stable on ties).
    /// 3. Claim available processors into child slots until `m - 1` slots are
    ///    filled. Claiming a processor makes every processor of the other
    ///    parent that shares one of its tasks unavailable.
    /// 4. Place each unassigned task on the child's least-loaded processor.
    ///
    /// Neither parent is modified.
    pub fn cross(&self, other: &CandidateSolution) -> CandidateSolution {
        debug_assert!(
            Arc::ptr_eq(&self.instance, &other.instance) || self.instance == other.instance,
            "crossing candidates of different instances"
        );

        let m = self.processors_count();
        let n = self.instance.task_count();
        let total = self.instance.total_duration() as u128;
        let parents = [self, other];

        let mut above = Vec::with_capacity(2 * m);
        let mut below = Vec::with_capacity(2 * m);
        for (origin, parent) in parents.iter().enumerate() {
            for (processor, &load) in parent.processor_load.iter().enumerate() {
                // load >= total / m, kept in integers
                if load as u128 * m as u128 >= total {
                    above.push((origin, processor, load));
                } else {
                    below.push((origin, processor, load));
                }
            }
        }
        above.sort_by_key(|&(_, _, load)| load);
        below.sort_by_key(|&(_, _, load)| Reverse(load));

        let mut available = [vec![true; m], vec![true; m]];
        let mut assignment: Vec<Option<usize>> = vec![None; n];
        let mut processors: ProcessorTasks = vec![Vec::new(); m];
        let mut processor_load = vec![0u64; m];
        let mut slot = 0;

        for (origin, processor, load) in above.into_iter().chain(below) {
            if slot + 1 >= m {
                break;
            }
            if !available[origin][processor] {
                continue;
            }
            available[origin][processor] = false;

            let donor = parents[origin];
            let partner = parents[1 - origin];
            for &task in &donor.processors[processor] {
                assignment[task] = Some(slot);
                available[1 - origin][partner.assignment[task]] = false;
            }
            processors[slot] = donor.processors[processor].clone();
            processor_load[slot] = load;
            slot += 1;
        }

        for (task, placed) in assignment.iter_mut().enumerate() {
            if placed.is_none() {
                let target = least_loaded(&processor_load);
                processor_load[target] += self.instance.duration(task);
                processors[target].push(task);
                *placed = Some(target);
            }
        }

        let makespan = processor_load.iter().copied().max().unwrap_or(0);
        CandidateSolution {
            instance: Arc::clone(&self.instance),
            assignment: assignment.into_iter().flatten().collect(),
            processors,
            processor_load,
            makespan,
        }
    }

    /// Recomputes every derived value from scratch and compares.
    ///
    /// O(n + m). Intended for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let n = self.instance.task_count();
        let m = self.instance.processors_count();
        if self.assignment.len() != n || self.processors.len() != m {
            return false;
        }

        let mut seen = vec![false; n];
        let mut loads = vec![0u64; m];
        for (processor, tasks) in self.processors.iter().enumerate() {
            for &task in tasks {
                if task >= n || seen[task] || self.assignment[task] != processor {
                    return false;
                }
                seen[task] = true;
                loads[processor] += self.instance.duration(task);
            }
        }

        seen.iter().all(|&s| s)
            && loads == self.processor_load
            && self.makespan == loads.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn example() -> Arc<ProblemInstance> {
        Arc::new(ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap())
    }

    fn random_candidate(instance: &Arc<ProblemInstance>, rng: &mut SmallRng) -> CandidateSolution {
        let m = instance.processors_count();
        let assignment = (0..instance.task_count())
            .map(|_| rng.random_range(0..m))
            .collect();
        CandidateSolution::from_assignment(Arc::clone(instance), assignment).unwrap()
    }

    #[test]
    fn test_from_assignment_loads() {
        let c = CandidateSolution::from_assignment(example(), vec![0, 0, 1, 1, 2, 2, 0, 1]).unwrap();
        assert_eq!(c.processor_loads(), &[7, 9, 14]);
        assert_eq!(c.makespan(), 14);
        assert_eq!(c.score(), 14);
        assert_eq!(c.processors()[1], vec![2, 3, 7]);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_from_assignment_errors() {
        assert_eq!(
            CandidateSolution::from_assignment(example(), vec![0; 3]).unwrap_err(),
            AssignmentError::WrongLength {
                expected: 8,
                found: 3
            }
        );
        assert_eq!(
            CandidateSolution::from_assignment(example(), vec![0, 0, 0, 0, 0, 0, 0, 3])
                .unwrap_err(),
            AssignmentError::ProcessorOutOfRange {
                task: 7,
                processor: 3
            }
        );
    }

    #[test]
    fn test_from_processors_errors() {
        let inst = example();
        let missing = vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]];
        assert_eq!(
            CandidateSolution::from_processors(Arc::clone(&inst), missing).unwrap_err(),
            AssignmentError::MissingTask(7)
        );
        let dup = vec![vec![0, 1, 2, 7], vec![3, 4, 7], vec![5, 6]];
        assert_eq!(
            CandidateSolution::from_processors(Arc::clone(&inst), dup).unwrap_err(),
            AssignmentError::DuplicateTask(7)
        );
        let unknown = vec![vec![0, 1, 2, 7], vec![3, 4, 9], vec![5, 6]];
        assert_eq!(
            CandidateSolution::from_processors(Arc::clone(&inst), unknown).unwrap_err(),
            AssignmentError::UnknownTask(9)
        );
        let short = vec![vec![0, 1, 2, 3, 4, 5, 6, 7]];
        assert!(matches!(
            CandidateSolution::from_processors(inst, short),
            Err(AssignmentError::WrongProcessorCount { .. })
        ));
    }

    #[test]
    fn test_from_processors_keeps_order() {
        let c = CandidateSolution::from_processors(
            example(),
            vec![vec![7, 0, 6], vec![5, 2], vec![4, 3, 1]],
        )
        .unwrap();
        assert_eq!(c.processors()[0], vec![7, 0, 6]);
        assert_eq!(c.assignment()[5], 1);
        assert_eq!(c.processor_loads(), &[4, 10, 16]);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_relocate_updates_loads() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut c =
            CandidateSolution::from_processors(example(), vec![vec![5], vec![4], vec![0, 1, 2, 3, 6, 7]])
                .unwrap();
        assert_eq!(c.makespan(), 16);

        assert!(c.relocate(0, 1, &mut rng));
        // Only task 5 could move
        assert_eq!(c.processor_loads(), &[0, 14, 16]);
        assert_eq!(c.assignment()[5], 1);
        assert!(c.is_consistent());

        // Empty source is a no-op
        assert!(!c.relocate(0, 2, &mut rng));
        assert_eq!(c.processor_loads(), &[0, 14, 16]);

        // Into an empty destination: appended
        assert!(c.relocate(2, 0, &mut rng));
        assert_eq!(c.processors()[0].len(), 1);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_relocate_same_processor_is_noop() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut c = CandidateSolution::from_assignment(example(), vec![0; 8]).unwrap();
        assert!(!c.relocate(0, 0, &mut rng));
        assert_eq!(c.makespan(), 30);
    }

    #[test]
    fn test_relocate_lowers_makespan() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut c = CandidateSolution::from_assignment(example(), vec![0; 8]).unwrap();
        assert_eq!(c.makespan(), 30);
        c.relocate(0, 1, &mut rng);
        assert!(c.makespan() < 30);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_cross_hand_computed() {
        // Durations [1,5,2,5,6,8,1,2], mean = 10
        // A: P0 {5,6,0} = 10, P1 {4,3} = 11, P2 {1,2,7} = 9
        // B: P0 {5,7} = 10, P1 {4,1} = 11, P2 {0,2,3,6} = 9
        let inst = example();
        let a = CandidateSolution::from_processors(
            Arc::clone(&inst),
            vec![vec![5, 6, 0], vec![4, 3], vec![1, 2, 7]],
        )
        .unwrap();
        let b = CandidateSolution::from_processors(
            Arc::clone(&inst),
            vec![vec![5, 7], vec![4, 1], vec![0, 2, 3, 6]],
        )
        .unwrap();

        let child = a.cross(&b);
        // Order: A.P0(10), B.P0(10), A.P1(11), B.P1(11), then A.P2(9), B.P2(9)
        // Claim A.P0 → blocks B.P0 (task 5) and B.P2 (tasks 0, 6).
        // B.P0 unavailable; claim A.P1 → blocks B.P1 (task 4), B.P2.
        // Two slots filled; leftovers {1, 2, 7} go to the least-loaded slot 2.
        assert_eq!(child.processors()[0], vec![5, 6, 0]);
        assert_eq!(child.processors()[1], vec![4, 3]);
        assert_eq!(child.processors()[2], vec![1, 2, 7]);
        assert_eq!(child.processor_loads(), &[10, 11, 9]);
        assert_eq!(child.makespan(), 11);
        assert!(child.is_consistent());

        // Parents untouched
        assert_eq!(a.processor_loads(), &[10, 11, 9]);
        assert_eq!(b.processor_loads(), &[10, 11, 9]);
    }

    #[test]
    fn test_cross_leftovers_balance() {
        // A puts everything on P0; B is balanced.
        let inst = example();
        let a = CandidateSolution::from_assignment(Arc::clone(&inst), vec![0; 8]).unwrap();
        let b = CandidateSolution::from_processors(
            Arc::clone(&inst),
            vec![vec![5, 6, 0], vec![4, 3], vec![1, 2, 7]],
        )
        .unwrap();
        let child = b.cross(&a);
        // Above mean: B.P0 (10), B.P1 (11), A.P0 (30). Claim B.P0, blocks A.P0;
        // claim B.P1. Leftovers {1, 2, 7} go to empty slot 2 in index order.
        assert_eq!(child.processor_loads(), &[10, 11, 9]);
        assert!(child.is_consistent());
    }

    #[test]
    fn test_cross_single_processor() {
        let inst = Arc::new(ProblemInstance::new(1, vec![3, 4, 5]).unwrap());
        let a = CandidateSolution::from_assignment(Arc::clone(&inst), vec![0, 0, 0]).unwrap();
        let child = a.cross(&a.clone());
        assert_eq!(child.makespan(), 12);
        assert!(child.is_consistent());
    }

    #[test]
    fn test_cross_no_tasks() {
        let inst = Arc::new(ProblemInstance::new(3, vec![]).unwrap());
        let a = CandidateSolution::from_assignment(Arc::clone(&inst), vec![]).unwrap();
        let child = a.cross(&a);
        assert_eq!(child.makespan(), 0);
        assert!(child.is_consistent());
    }

    #[test]
    fn test_random_operation_sequences_stay_consistent() {
        let mut rng = SmallRng::seed_from_u64(42);
        let inst = Arc::new(
            ProblemInstance::new(5, (0..40).map(|i| (i * 7 % 23) as u64).collect()).unwrap(),
        );

        for _ in 0..20 {
            let mut a = random_candidate(&inst, &mut rng);
            let mut b = random_candidate(&inst, &mut rng);
            for step in 0..200 {
                let strategy = if step % 2 == 0 {
                    MutationStrategy::Uniform
                } else {
                    MutationStrategy::LoadWeighted
                };
                a.mutate(strategy, &mut rng);
                b.mutate(strategy, &mut rng);
                if step % 25 == 0 {
                    let child = a.cross(&b);
                    assert!(child.is_consistent());
                    b = child;
                }
                assert!(a.is_consistent());
                assert!(b.is_consistent());
            }
        }
    }

    #[test]
    fn test_to_schedule() {
        let c = CandidateSolution::from_processors(
            example(),
            vec![vec![5, 6, 0], vec![4, 3], vec![1, 2, 7]],
        )
        .unwrap();
        let s = c.to_schedule();
        assert_eq!(s.makespan(), c.makespan());
        assert_eq!(s.processor_loads(), c.processor_loads());
        assert_eq!(s.task_count(), 8);
    }
}
