//! Configurable search operators.
//!
//! Provides runtime-selectable mutation and pairing strategies via
//! [`SearchOperators`].
//!
//! # Usage
//!
//! ```
//! use u_pcmax::search::{SearchOperators, MutationStrategy, PairingStrategy};
//!
//! let ops = SearchOperators::default();
//! assert_eq!(ops.mutation, MutationStrategy::LoadWeighted);
//! assert_eq!(ops.pairing, PairingStrategy::Sibling);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::candidate::CandidateSolution;

/// How `mutate` picks the source processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MutationStrategy {
    /// Source and destination drawn uniformly among distinct processors.
    Uniform,
    /// Source drawn with probability proportional to its load; destination
    /// uniform among the others.
    #[default]
    LoadWeighted,
}

/// Which partner each survivor is crossed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairingStrategy {
    /// Survivor `i` with survivor `(i + 1) mod k`; a lone survivor with the parent.
    #[default]
    Sibling,
    /// Every survivor with the parent it was cloned from.
    Parent,
    /// Every survivor with itself.
    SelfCross,
}

impl MutationStrategy {
    /// Applies one mutation. Returns `true` if a task moved.
    pub fn apply<R: Rng>(self, candidate: &mut CandidateSolution, rng: &mut R) -> bool {
        match self {
            MutationStrategy::Uniform => uniform_mutation(candidate, rng),
            MutationStrategy::LoadWeighted => load_weighted_mutation(candidate, rng),
        }
    }
}

/// Uniform mutation: moves a task between two uniformly drawn distinct processors.
pub fn uniform_mutation<R: Rng>(candidate: &mut CandidateSolution, rng: &mut R) -> bool {
    let m = candidate.processors_count();
    if m < 2 {
        return false;
    }
    let source = rng.random_range(0..m);
    let destination = other_processor(source, m, rng);
    candidate.relocate(source, destination, rng)
}

/// Load-weighted mutation: heavier processors give up tasks more often.
///
/// Falls back to a uniform source when every processor is empty of load.
pub fn load_weighted_mutation<R: Rng>(candidate: &mut CandidateSolution, rng: &mut R) -> bool {
    let m = candidate.processors_count();
    if m < 2 {
        return false;
    }
    let loads = candidate.processor_loads();
    let total: u64 = loads.iter().sum();
    let source = if total == 0 {
        rng.random_range(0..m)
    } else {
        let mut ticket = rng.random_range(0..total);
        let mut chosen = m - 1;
        for (p, &load) in loads.iter().enumerate() {
            if ticket < load {
                chosen = p;
                break;
            }
            ticket -= load;
        }
        chosen
    };
    let destination = other_processor(source, m, rng);
    candidate.relocate(source, destination, rng)
}

/// Uniform processor index different from `source`.
#[inline]
fn other_processor<R: Rng>(source: usize, m: usize, rng: &mut R) -> usize {
    (source + rng.random_range(1..m)) % m
}

/// Runtime-selectable operators for a search worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOperators {
    /// Mutation strategy.
    pub mutation: MutationStrategy,
    /// Crossover pairing strategy.
    pub pairing: PairingStrategy,
}

impl SearchOperators {
    /// Mutates a candidate with the configured strategy.
    pub fn mutate<R: Rng>(&self, candidate: &mut CandidateSolution, rng: &mut R) -> bool {
        self.mutation.apply(candidate, rng)
    }

    /// Crosses every survivor with its partner, one child per survivor.
    pub fn recombine(
        &self,
        survivors: &[CandidateSolution],
        parent: &CandidateSolution,
    ) -> Vec<CandidateSolution> {
        let k = survivors.len();
        survivors
            .iter()
            .enumerate()
            .map(|(i, survivor)| match self.pairing {
                PairingStrategy::Sibling if k > 1 => survivor.cross(&survivors[(i + 1) % k]),
                PairingStrategy::Sibling | PairingStrategy::Parent => survivor.cross(parent),
                PairingStrategy::SelfCross => survivor.cross(survivor),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProblemInstance;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn example() -> Arc<ProblemInstance> {
        Arc::new(ProblemInstance::new(3, vec![1, 5, 2, 5, 6, 8, 1, 2]).unwrap())
    }

    fn balanced() -> CandidateSolution {
        CandidateSolution::from_processors(example(), vec![vec![5, 6, 0], vec![4, 3], vec![1, 2, 7]])
            .unwrap()
    }

    #[test]
    fn test_default_operators() {
        let ops = SearchOperators::default();
        assert_eq!(ops.mutation, MutationStrategy::LoadWeighted);
        assert_eq!(ops.pairing, PairingStrategy::Sibling);
    }

    #[test]
    fn test_uniform_mutation_moves_one_task() {
        let mut rng = SmallRng::seed_from_u64(42);
        let before = balanced();
        let mut c = before.clone();
        let moved = uniform_mutation(&mut c, &mut rng);
        assert!(moved);
        let changed = (0..8)
            .filter(|&t| c.assignment()[t] != before.assignment()[t])
            .count();
        assert_eq!(changed, 1);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_load_weighted_never_picks_empty_source() {
        let mut rng = SmallRng::seed_from_u64(9);
        // P1 and P2 empty: every weighted draw must pick P0.
        for _ in 0..50 {
            let mut c = CandidateSolution::from_assignment(example(), vec![0; 8]).unwrap();
            assert!(load_weighted_mutation(&mut c, &mut rng));
            assert_eq!(c.processors()[0].len(), 7);
        }
    }

    #[test]
    fn test_load_weighted_zero_loads_falls_back() {
        let inst = Arc::new(ProblemInstance::new(3, vec![0, 0, 0]).unwrap());
        let mut rng = SmallRng::seed_from_u64(5);
        let mut c = CandidateSolution::from_assignment(inst, vec![0, 1, 2]).unwrap();
        for _ in 0..20 {
            load_weighted_mutation(&mut c, &mut rng);
            assert!(c.is_consistent());
            assert_eq!(c.makespan(), 0);
        }
    }

    #[test]
    fn test_single_processor_mutation_is_noop() {
        let inst = Arc::new(ProblemInstance::new(1, vec![4, 2]).unwrap());
        let mut rng = SmallRng::seed_from_u64(0);
        let mut c = CandidateSolution::from_assignment(inst, vec![0, 0]).unwrap();
        assert!(!uniform_mutation(&mut c, &mut rng));
        assert!(!load_weighted_mutation(&mut c, &mut rng));
        assert_eq!(c.makespan(), 6);
    }

    #[test]
    fn test_recombine_one_child_per_survivor() {
        let mut rng = SmallRng::seed_from_u64(11);
        let parent = balanced();
        let survivors: Vec<_> = (0..4)
            .map(|_| {
                let mut c = parent.clone();
                c.mutate(MutationStrategy::Uniform, &mut rng);
                c
            })
            .collect();

        for pairing in [
            PairingStrategy::Sibling,
            PairingStrategy::Parent,
            PairingStrategy::SelfCross,
        ] {
            let ops = SearchOperators {
                mutation: MutationStrategy::Uniform,
                pairing,
            };
            let children = ops.recombine(&survivors, &parent);
            assert_eq!(children.len(), 4);
            assert!(children.iter().all(CandidateSolution::is_consistent));
        }
    }

    #[test]
    fn test_lone_sibling_pairs_with_parent() {
        let parent = balanced();
        let lone = vec![CandidateSolution::from_assignment(example(), vec![0; 8]).unwrap()];
        let sibling = SearchOperators::default().recombine(&lone, &parent);
        let with_parent = SearchOperators {
            pairing: PairingStrategy::Parent,
            ..SearchOperators::default()
        }
        .recombine(&lone, &parent);
        assert_eq!(sibling[0].assignment(), with_parent[0].assignment());
    }
}
