//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::operators::{MutationStrategy, PairingStrategy, SearchOperators};

/// Tunables for one search run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use u_pcmax::search::{EngineConfig, PairingStrategy};
///
/// let config = EngineConfig::default()
///     .with_threads(4)
///     .with_time_budget(Duration::from_millis(200))
///     .with_pairing(PairingStrategy::Parent)
///     .with_seed(7);
/// assert_eq!(config.threads_count, 4);
/// assert_eq!(config.requested_capacity(), 4 * 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads.
    pub threads_count: usize,
    /// Mutated clones per cycle.
    pub population_size: usize,
    /// Clones kept for crossover per cycle.
    pub best_per_thread: usize,
    /// Wall-clock budget; `None` runs until another stop condition fires.
    pub time_budget: Option<Duration>,
    /// Total worker cycles across all threads.
    pub cycle_limit: Option<u64>,
    /// Base PRNG seed; worker `i` uses `seed + i`. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Mutation strategy.
    pub mutation: MutationStrategy,
    /// Crossover pairing strategy.
    pub pairing: PairingStrategy,
    /// Stop once the incumbent reaches the trivial lower bound.
    pub stop_at_lower_bound: bool,
    /// Requested queue capacity; defaults to `threads_count * population_size`.
    pub queue_capacity: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads_count: 8,
            population_size: 32,
            best_per_thread: 6,
            time_budget: None,
            cycle_limit: None,
            seed: None,
            mutation: MutationStrategy::default(),
            pairing: PairingStrategy::default(),
            stop_at_lower_bound: true,
            queue_capacity: None,
        }
    }
}

impl EngineConfig {
    /// Sets the number of worker threads.
    pub fn with_threads(mut self, threads_count: usize) -> Self {
        self.threads_count = threads_count;
        self
    }

    /// Sets the population size per cycle.
    pub fn with_population(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    /// Sets the survivors kept per cycle.
    pub fn with_survivors(mut self, best_per_thread: usize) -> Self {
        self.best_per_thread = best_per_thread;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the total cycle limit.
    pub fn with_cycle_limit(mut self, cycles: u64) -> Self {
        self.cycle_limit = Some(cycles);
        self
    }

    /// Sets the base PRNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the mutation strategy.
    pub fn with_mutation(mut self, mutation: MutationStrategy) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the crossover pairing strategy.
    pub fn with_pairing(mut self, pairing: PairingStrategy) -> Self {
        self.pairing = pairing;
        self
    }

    /// Enables or disables stopping at the lower bound.
    pub fn with_stop_at_lower_bound(mut self, stop: bool) -> Self {
        self.stop_at_lower_bound = stop;
        self
    }

    /// Overrides the requested queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Queue capacity requested before power-of-two rounding.
    pub fn requested_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or_else(|| self.threads_count.saturating_mul(self.population_size))
    }

    /// Operators selected by this configuration.
    pub fn operators(&self) -> SearchOperators {
        SearchOperators {
            mutation: self.mutation,
            pairing: self.pairing,
        }
    }
}
